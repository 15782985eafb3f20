//! Boundary where external stat inputs enter the core

use super::StatVector;
use crate::types::StatKind;
use tracing::warn;

/// Something that was coerced or dropped while reading inputs
#[derive(Debug, Clone, PartialEq)]
pub enum InputIssue {
    /// Key does not name a known stat
    UnknownKey(String),
    /// NaN or infinite value, replaced with 0
    NonFinite(StatKind),
    /// Negative value, replaced with 0
    Negative(StatKind, f64),
}

impl StatVector {
    /// Build a vector from raw `(key, value)` pairs supplied by the caller.
    ///
    /// This is the only place invalid numbers are repaired: non-finite and
    /// negative values become 0 and unknown keys are ignored. Everything
    /// downstream assumes a sanitised vector.
    pub fn from_inputs<'a, I>(inputs: I) -> (StatVector, Vec<InputIssue>)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut stats = StatVector::zero();
        let mut issues = Vec::new();

        for (key, value) in inputs {
            let Some(kind) = StatKind::from_key(key) else {
                warn!(key, "ignoring unknown stat input");
                issues.push(InputIssue::UnknownKey(key.to_string()));
                continue;
            };

            let value = if !value.is_finite() {
                warn!(stat = kind.key(), "non-finite stat input coerced to 0");
                issues.push(InputIssue::NonFinite(kind));
                0.0
            } else if value < 0.0 {
                warn!(stat = kind.key(), value, "negative stat input coerced to 0");
                issues.push(InputIssue::Negative(kind, value));
                0.0
            } else {
                value
            };

            stats.set(kind, value);
        }

        (stats, issues)
    }
}
