//! Lazy pagination over list-style operations.
//!
//! The paginator is driven by the operation's [`Pagination`] metadata: the
//! token of the next page is read from the result field named by
//! `output_token` and written into the request member named by
//! `input_token`. A page size, when requested, goes into `limit_key`.

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;

use crate::client::{ApiClient, CallOptions};
use crate::descriptor::{OperationDescriptor, Pagination};
use crate::error::{ApiError, ConfigError, DeserializationError, ValidationError};
use crate::operation::{PagedOperation, PagedOutput};

/// Drives a paginated operation page by page.
///
/// Pages are fetched strictly sequentially and only when the consumer polls;
/// dropping the stream stops further calls. Each call to
/// [`pages`](Self::pages) starts over from the request as given.
///
/// ## Examples
///
/// ```rust,ignore
/// use futures::TryStreamExt;
///
/// let paginator = client.paginate(ListTrainingJobs::default())?.with_page_size(50)?;
/// let mut pages = std::pin::pin!(paginator.pages());
/// while let Some(page) = pages.try_next().await? {
///     for job in page.training_job_summaries.unwrap_or_default() {
///         println!("{:?}", job.training_job_name);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Paginator<'a, O> {
    client: &'a ApiClient,
    request: O,
    pagination: &'static Pagination,
    page_size: Option<u32>,
    options: CallOptions,
}

impl<'a, O> Paginator<'a, O>
where
    O: PagedOperation,
    O::Output: PagedOutput,
{
    /// ## Errors
    ///
    /// Returns [`ConfigError::NotPaginated`] if the operation's descriptor
    /// carries no pagination metadata.
    pub fn new(client: &'a ApiClient, request: O) -> Result<Self, ConfigError> {
        let descriptor = O::descriptor();
        let Some(pagination) = descriptor.pagination() else {
            return Err(ConfigError::NotPaginated {
                operation: descriptor.id().to_string(),
            });
        };
        Ok(Self {
            client,
            request,
            pagination,
            page_size: None,
            options: CallOptions::default(),
        })
    }

    /// Options applied to every page fetch.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Requests at most `page_size` items per page, overriding any limit set
    /// on the request itself.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::NoPageLimit`] if the operation declares no
    /// page size member.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, ConfigError> {
        if self.pagination.limit_key.is_none() {
            return Err(ConfigError::NoPageLimit {
                operation: O::descriptor().id().to_string(),
            });
        }
        self.page_size = Some(page_size);
        Ok(self)
    }

    /// A lazy stream of pages.
    ///
    /// The stream ends after the first page whose next token is absent or
    /// empty. An error is yielded where it happens and ends the stream.
    pub fn pages(&self) -> impl Stream<Item = Result<O::Output, ApiError>> + '_ {
        let descriptor: &'static OperationDescriptor = O::descriptor();

        // `None` state: done. `Some(None)`: first page, request as given.
        stream::try_unfold(Some(None::<String>), move |state| async move {
            let Some(token) = state else {
                return Ok::<_, ApiError>(None);
            };
            let request = self.page_request(token)?;
            let page: Value = self
                .client
                .execute(descriptor, &request, &self.options)
                .await?;

            let next = page
                .get(&self.pagination.output_token)
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_owned);
            let page: O::Output = serde_json::from_value(page)
                .map_err(|e| DeserializationError::from_json(descriptor.id().as_str(), &e))?;
            Ok(Some((page, next.map(Some))))
        })
    }

    /// Fetches every page.
    pub async fn collect_pages(&self) -> Result<Vec<O::Output>, ApiError> {
        self.pages().try_collect().await
    }

    /// A lazy stream of the items of every page, in order.
    pub fn items(
        &self,
    ) -> impl Stream<Item = Result<<O::Output as PagedOutput>::Item, ApiError>> + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok::<_, ApiError>)))
            .try_flatten()
    }

    /// The request of one page as JSON, with the continuation token and page
    /// size written into their members.
    fn page_request(&self, token: Option<String>) -> Result<Value, ApiError> {
        let mut request = serde_json::to_value(&self.request)
            .map_err(|e| ValidationError::Serialization(e.to_string()))?;
        // A non-object request is left for the marshaler to reject.
        if let Value::Object(fields) = &mut request {
            if let Some(token) = token {
                fields.insert(self.pagination.input_token.clone(), Value::String(token));
            }
            if let (Some(limit_key), Some(size)) = (&self.pagination.limit_key, self.page_size) {
                fields.insert(limit_key.clone(), Value::from(size));
            }
        }
        Ok(request)
    }
}

impl ApiClient {
    /// Creates a [`Paginator`] for `request`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::NotPaginated`] for operations without
    /// pagination metadata.
    pub fn paginate<O>(&self, request: O) -> Result<Paginator<'_, O>, ConfigError>
    where
        O: PagedOperation,
        O::Output: PagedOutput,
    {
        Paginator::new(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Member, OperationDescriptor, Pagination};
    use crate::method::RestMethod;
    use crate::operation::Operation;
    use crate::client::RetryPolicy;
    use crate::resolver::StaticEndpoint;
    use futures::StreamExt;
    use once_cell::sync::Lazy;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ListWidgets {
        #[serde(skip_serializing_if = "Option::is_none")]
        next_token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct WidgetPage {
        widgets: Option<Vec<String>>,
        next_token: Option<String>,
    }

    static LIST_WIDGETS: Lazy<OperationDescriptor> = Lazy::new(|| {
        OperationDescriptor::builder()
            .id("ListWidgets")
            .method(RestMethod::Get)
            .uri("/widgets")
            .member(Member::query("nextToken"))
            .member(Member::query("limit"))
            .paginated(Pagination::next_token().with_limit("limit"))
            .build()
            .unwrap()
    });

    impl Operation for ListWidgets {
        type Output = WidgetPage;

        fn descriptor() -> &'static OperationDescriptor {
            &LIST_WIDGETS
        }
    }

    impl PagedOperation for ListWidgets {}

    impl PagedOutput for WidgetPage {
        type Item = String;

        fn into_items(self) -> Vec<String> {
            self.widgets.unwrap_or_default()
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct Unpaged;

    static UNPAGED: Lazy<OperationDescriptor> = Lazy::new(|| {
        OperationDescriptor::builder()
            .id("Unpaged")
            .method(RestMethod::Get)
            .uri("/unpaged")
            .build()
            .unwrap()
    });

    impl Operation for Unpaged {
        type Output = WidgetPage;

        fn descriptor() -> &'static OperationDescriptor {
            &UNPAGED
        }
    }

    impl PagedOperation for Unpaged {}

    /// Token names differ between request and result, and there is no
    /// page size member.
    #[derive(Debug, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ListGadgets {
        #[serde(skip_serializing_if = "Option::is_none")]
        page_token: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GadgetPage {
        gadgets: Vec<String>,
    }

    static LIST_GADGETS: Lazy<OperationDescriptor> = Lazy::new(|| {
        OperationDescriptor::builder()
            .id("ListGadgets")
            .method(RestMethod::Get)
            .uri("/gadgets")
            .member(Member::query("pageToken"))
            .paginated(Pagination::new("pageToken", "nextPageToken"))
            .build()
            .unwrap()
    });

    impl Operation for ListGadgets {
        type Output = GadgetPage;

        fn descriptor() -> &'static OperationDescriptor {
            &LIST_GADGETS
        }
    }

    impl PagedOperation for ListGadgets {}

    impl PagedOutput for GadgetPage {
        type Item = String;

        fn into_items(self) -> Vec<String> {
            self.gadgets
        }
    }

    async fn mount_page(server: &MockServer, token: Option<&str>, body: serde_json::Value, calls: u64) {
        let mock = Mock::given(method("GET")).and(path("/widgets"));
        let mock = match token {
            Some(token) => mock.and(query_param("nextToken", token)),
            None => mock.and(query_param_is_missing("nextToken")),
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(calls)
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::builder(StaticEndpoint::parse(&server.uri()).unwrap())
            .retry_policy(RetryPolicy::no_retries())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_three_pages_then_stop() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a", "b"], "nextToken": "t1" }), 1).await;
        mount_page(&server, Some("t1"), json!({ "widgets": ["c"], "nextToken": "t2" }), 1).await;
        mount_page(&server, Some("t2"), json!({ "widgets": ["d"] }), 1).await;

        let client = client(&server);
        let paginator = client.paginate(ListWidgets::default()).unwrap();
        let pages = paginator.collect_pages().await.unwrap();
        assert_eq!(pages.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_token_ends_stream() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a"], "nextToken": "t1" }), 1).await;
        mount_page(&server, Some("t1"), json!({ "widgets": ["b"], "nextToken": "" }), 1).await;

        let client = client(&server);
        let paginator = client.paginate(ListWidgets::default()).unwrap();
        let items: Vec<String> = paginator.items().try_collect().await.unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_no_look_ahead() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a"], "nextToken": "t1" }), 1).await;
        mount_page(&server, Some("t1"), json!({ "widgets": ["b"] }), 0).await;

        let client = client(&server);
        let paginator = client.paginate(ListWidgets::default()).unwrap();
        let mut pages = std::pin::pin!(paginator.pages());
        let first = pages.next().await.unwrap().unwrap();
        assert_eq!(first.next_token.as_deref(), Some("t1"));
        // Give a prefetching implementation the chance to misbehave.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_restartable() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a"] }), 2).await;

        let client = client(&server);
        let paginator = client.paginate(ListWidgets::default()).unwrap();
        assert_eq!(paginator.collect_pages().await.unwrap().len(), 1);
        assert_eq!(paginator.collect_pages().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_mid_stream_ends_stream() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a"], "nextToken": "t1" }), 1).await;
        Mock::given(method("GET"))
            .and(query_param("nextToken", "t1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "code": "InvalidToken" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let paginator = client.paginate(ListWidgets::default()).unwrap();
        let results: Vec<_> = paginator.pages().collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().status_code(), Some(400));
    }

    #[tokio::test]
    async fn test_tokens_follow_descriptor_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gadgets"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "gadgets": ["a"], "nextPageToken": "p2" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gadgets"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "gadgets": ["b"] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let paginator = client.paginate(ListGadgets::default()).unwrap();
        let items: Vec<String> = paginator.items().try_collect().await.unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_starts_from_token_on_request() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({ "widgets": ["a"] }), 0).await;
        mount_page(&server, Some("t5"), json!({ "widgets": ["f"] }), 1).await;

        let client = client(&server);
        let request = ListWidgets {
            next_token: Some("t5".to_string()),
            ..Default::default()
        };
        let items: Vec<String> = client.paginate(request).unwrap().items().try_collect().await.unwrap();
        assert_eq!(items, vec!["f".to_string()]);
    }

    #[tokio::test]
    async fn test_page_size_goes_to_limit_member() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("limit", "2"))
            .and(query_param_is_missing("nextToken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "widgets": ["a", "b"], "nextToken": "t1" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .and(query_param("limit", "2"))
            .and(query_param("nextToken", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "widgets": ["c"] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let request = ListWidgets {
            limit: Some(50),
            ..Default::default()
        };
        let paginator = client.paginate(request).unwrap().with_page_size(2).unwrap();
        assert_eq!(paginator.collect_pages().await.unwrap().len(), 2);
    }

    #[test]
    fn test_page_size_needs_limit_member() {
        let client = ApiClient::with_base_url("http://localhost").unwrap();
        let err = client
            .paginate(ListGadgets::default())
            .unwrap()
            .with_page_size(10)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoPageLimit { ref operation } if operation == "ListGadgets"));
    }

    #[tokio::test]
    async fn test_undecodable_page_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gadgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "gadgets": "none" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client
            .paginate(ListGadgets::default())
            .unwrap()
            .collect_pages()
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn test_unpaginated_operation_rejected() {
        let client = ApiClient::with_base_url("http://localhost").unwrap();
        let err = client.paginate(Unpaged).unwrap_err();
        assert!(matches!(err, ConfigError::NotPaginated { ref operation } if operation == "Unpaged"));
    }
}
