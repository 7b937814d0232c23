use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use mlsdk_core::{
    Anonymous, ApiClient, ApiClientBuilder, ApiError, ClientConfig, ConfigError, EnvCredentials,
    RegionalEndpoint, StaticEndpoint,
};
use mlsdk_models::machine_learning::GetMlModel;
use mlsdk_models::training::{
    DescribeTrainingJob, ListTrainingJobs, SortBy, SortOrder, StopTrainingJob, TrainingJobStatus,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Call the ML platform API from the command line.
///
/// Examples:
///   mlsdk list-training-jobs --status InProgress --all
///   mlsdk describe-training-job xgb-churn-1
///   mlsdk --endpoint http://localhost:8080 get-ml-model ml-abc --verbose
#[derive(Debug, Parser)]
#[command(name = "mlsdk")]
#[command(about = "Call the ML platform API", long_about = None)]
struct Cli {
    /// Send every request to this base URL instead of the regional endpoint.
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Domain of the regional endpoints (`{service}.{region}.{domain}`).
    #[arg(long, global = true, default_value = "amazonaws.com", value_name = "DOMAIN")]
    domain: String,

    /// Region to call; overrides MLSDK_REGION.
    #[arg(long, global = true)]
    region: Option<String>,

    /// Environment variable holding the bearer token (repeat for a fallback chain).
    #[arg(long = "token-env", global = true, value_name = "VAR")]
    token_env: Vec<String>,

    /// Send requests unsigned.
    #[arg(long, global = true, conflicts_with = "token_env")]
    anonymous: bool,

    /// Enable DEBUG-level logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List training jobs
    ListTrainingJobs {
        /// Only jobs in this status
        #[arg(long)]
        status: Option<TrainingJobStatus>,

        /// Only jobs whose name contains this text
        #[arg(long)]
        name_contains: Option<String>,

        #[arg(long)]
        sort_by: Option<SortBy>,

        #[arg(long)]
        sort_order: Option<SortOrder>,

        /// Page size (1-100)
        #[arg(long)]
        max_results: Option<u32>,

        /// Follow continuation tokens and print every job
        #[arg(long)]
        all: bool,
    },

    /// Show one training job
    DescribeTrainingJob {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Stop a running training job
    StopTrainingJob {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Show one batch ML model
    GetMlModel {
        #[arg(value_name = "MODEL_ID")]
        id: String,

        /// Include the model recipe
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    run(cli).await
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(cli: &Cli) -> Result<ApiClient, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(region) = &cli.region {
        config.region = region.clone();
    }

    let builder: ApiClientBuilder = match &cli.endpoint {
        Some(url) => ApiClient::builder(StaticEndpoint::parse(url)?),
        None => ApiClient::builder(RegionalEndpoint::new(cli.domain.as_str())),
    }
    .config(config);

    let builder = if cli.anonymous {
        builder.credentials(Anonymous)
    } else if cli.token_env.is_empty() {
        builder.credentials(EnvCredentials::default())
    } else {
        builder.credentials(EnvCredentials::new(cli.token_env.iter().cloned()))
    };

    Ok(builder.build()?)
}

#[tracing::instrument(skip(cli))]
async fn run(cli: Cli) -> Result<(), CliError> {
    let client = build_client(&cli)?;
    info!(region = %client.config().region, "client ready");

    match cli.command {
        Command::ListTrainingJobs {
            status,
            name_contains,
            sort_by,
            sort_order,
            max_results,
            all,
        } => {
            let request = ListTrainingJobs {
                status_equals: status,
                name_contains,
                sort_by,
                sort_order,
                max_results,
                ..Default::default()
            };
            if all {
                let jobs: Vec<_> = client.paginate(request)?.items().try_collect().await?;
                print_json(&jobs)
            } else {
                print_json(&client.invoke(&request).await?)
            }
        }
        Command::DescribeTrainingJob { name } => {
            print_json(&client.invoke(&DescribeTrainingJob::new(name)).await?)
        }
        Command::StopTrainingJob { name } => {
            print_json(&client.invoke(&StopTrainingJob::new(name)).await?)
        }
        Command::GetMlModel { id, verbose } => {
            let request = GetMlModel::new(id);
            let request = if verbose { request.verbose(true) } else { request };
            print_json(&client.invoke(&request).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
