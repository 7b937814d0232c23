//! Closed string enums with strict parsing.
//!
//! Wire enums are plain Rust enums deriving `strum::EnumIter` and
//! `strum::IntoStaticStr` (the `#[strum(serialize = "...")]` attribute sets
//! the wire token). [`wire_enum!`](crate::wire_enum) then adds the
//! [`WireEnum`] impl along with `FromStr`, `Display` and serde support, all
//! routed through the same strict lookup.
//!
//! ## Examples
//!
//! ```rust
//! use mlsdk_core::{wire_enum, WireEnum};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
//! pub enum SortOrder {
//!     Ascending,
//!     Descending,
//! }
//! wire_enum!(SortOrder);
//!
//! assert_eq!(SortOrder::parse("Ascending").unwrap(), SortOrder::Ascending);
//! assert!(SortOrder::parse("ascending").is_err());
//! assert_eq!(SortOrder::Descending.render(), "Descending");
//! ```

use strum::IntoEnumIterator;

use crate::error::InvalidEnumValue;

/// A closed set of string tokens.
pub trait WireEnum:
    Sized + Copy + PartialEq + IntoEnumIterator + Into<&'static str> + 'static
{
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Returns the wire token for this value.
    fn render(self) -> &'static str {
        self.into()
    }

    /// Every declared token, in declaration order.
    fn allowed() -> Vec<&'static str> {
        Self::iter().map(WireEnum::render).collect()
    }

    /// Looks up `raw` among the declared tokens (case-sensitive, exact).
    fn parse(raw: &str) -> Result<Self, InvalidEnumValue> {
        Self::iter()
            .find(|v| v.render() == raw)
            .ok_or_else(|| InvalidEnumValue {
                enum_name: Self::NAME,
                given: raw.to_string(),
                allowed: Self::allowed(),
            })
    }

    /// Like [`parse`](WireEnum::parse), but hands the raw token back on
    /// failure so callers can keep it as an untyped string.
    fn parse_lenient(raw: &str) -> Result<Self, String> {
        Self::parse(raw).map_err(|e| e.given)
    }
}

/// Implements [`WireEnum`], `FromStr`, `Display`, `Serialize` and
/// `Deserialize` for an enum deriving `EnumIter` and `IntoStaticStr`.
///
/// Deserializing an unknown token is an error, not a fallback.
#[macro_export]
macro_rules! wire_enum {
    ($ty:ident) => {
        impl $crate::WireEnum for $ty {
            const NAME: &'static str = stringify!($ty);
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::InvalidEnumValue;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$ty as $crate::WireEnum>::parse(s)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::WireEnum::render(*self))
            }
        }

        impl $crate::__private::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::WireEnum::render(*self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                <$ty as $crate::WireEnum>::parse(&raw)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::{EnumIter, IntoStaticStr};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
    enum SortOrder {
        Ascending,
        Descending,
    }
    crate::wire_enum!(SortOrder);

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
    enum InstanceType {
        #[strum(serialize = "ml.m5.large")]
        MlM5Large,
        #[strum(serialize = "ml.p3.2xlarge")]
        MlP32xlarge,
    }
    crate::wire_enum!(InstanceType);

    #[test]
    fn test_parse_exact_match() {
        assert_eq!(SortOrder::parse("Ascending").unwrap(), SortOrder::Ascending);
        assert_eq!(
            InstanceType::parse("ml.p3.2xlarge").unwrap(),
            InstanceType::MlP32xlarge
        );
    }

    #[test]
    fn test_parse_wrong_case_fails() {
        let err = SortOrder::parse("ascending").unwrap_err();
        assert_eq!(err.enum_name, "SortOrder");
        assert_eq!(err.given, "ascending");
        assert_eq!(err.allowed, vec!["Ascending", "Descending"]);
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(SortOrder::parse("").is_err());
    }

    #[test]
    fn test_parse_lenient_returns_raw() {
        assert_eq!(SortOrder::parse_lenient("Sideways"), Err("Sideways".to_string()));
        assert_eq!(SortOrder::parse_lenient("Descending"), Ok(SortOrder::Descending));
    }

    #[test]
    fn test_round_trip_all_declared_values() {
        for v in SortOrder::iter() {
            assert_eq!(SortOrder::parse(v.render()).unwrap(), v);
        }
        for v in InstanceType::iter() {
            assert_eq!(InstanceType::parse(v.render()).unwrap(), v);
        }
    }

    #[test]
    fn test_from_str_and_display() {
        let v: InstanceType = "ml.m5.large".parse().unwrap();
        assert_eq!(v.to_string(), "ml.m5.large");
    }

    #[test]
    fn test_serde_uses_wire_token() {
        let json = serde_json::to_string(&InstanceType::MlM5Large).unwrap();
        assert_eq!(json, "\"ml.m5.large\"");

        let back: InstanceType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InstanceType::MlM5Large);
    }

    #[test]
    fn test_deserialize_unknown_token_fails() {
        let err = serde_json::from_str::<SortOrder>("\"Random\"").unwrap_err();
        assert!(err.to_string().contains("Invalid value \"Random\" for SortOrder"));
    }

    proptest! {
        #[test]
        fn prop_non_members_are_rejected(raw in "\\PC*") {
            prop_assume!(raw != "Ascending" && raw != "Descending");
            prop_assert!(SortOrder::parse(&raw).is_err());
        }
    }
}
