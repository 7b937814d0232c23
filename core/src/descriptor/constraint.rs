//! Field constraints checked before a request leaves the process.

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::error::ConfigError;

/// A declared restriction on a member's value.
///
/// Constraints only apply to values of a matching JSON type: `Length` to
/// strings (in characters), sequences and maps (in entries), `Pattern` to
/// strings, `Range` to numbers. A constraint never fails on a type it does
/// not apply to.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Inclusive length bounds.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// The whole string must match.
    Pattern(Regex),
    /// Inclusive numeric bounds.
    Range { min: Option<f64>, max: Option<f64> },
}

impl Constraint {
    /// Compiles a pattern constraint. The pattern must match the entire
    /// value, as if wrapped in `^(?:...)$`.
    pub fn pattern(member: &str, pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(&format!("^(?:{pattern})$"))
            .map(Self::Pattern)
            .map_err(|source| ConfigError::InvalidPattern {
                member: member.to_string(),
                source,
            })
    }

    /// Returns `true` if `value` satisfies this constraint.
    pub fn is_satisfied_by(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Length { min, max }, Value::String(s)) => within(s.chars().count(), *min, *max),
            (Self::Length { min, max }, Value::Array(items)) => within(items.len(), *min, *max),
            (Self::Length { min, max }, Value::Object(entries)) => {
                within(entries.len(), *min, *max)
            }
            (Self::Pattern(regex), Value::String(s)) => regex.is_match(s),
            (Self::Range { min, max }, Value::Number(n)) => match n.as_f64() {
                Some(x) => min.map_or(true, |m| x >= m) && max.map_or(true, |m| x <= m),
                None => false,
            },
            _ => true,
        }
    }
}

fn within<T: PartialOrd + Copy>(x: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |m| x >= m) && max.map_or(true, |m| x <= m)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { min, max } => {
                f.write_str("length ")?;
                write_bounds(f, min.as_ref(), max.as_ref())
            }
            Self::Pattern(regex) => {
                let source = regex.as_str();
                let inner = source
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(source);
                write!(f, "pattern {inner}")
            }
            Self::Range { min, max } => {
                f.write_str("range ")?;
                write_bounds(f, min.as_ref(), max.as_ref())
            }
        }
    }
}

fn write_bounds<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    min: Option<&T>,
    max: Option<&T>,
) -> fmt::Result {
    match (min, max) {
        (Some(lo), Some(hi)) => write!(f, "{lo}..={hi}"),
        (Some(lo), None) => write!(f, ">= {lo}"),
        (None, Some(hi)) => write!(f, "<= {hi}"),
        (None, None) => f.write_str("unbounded"),
    }
}
