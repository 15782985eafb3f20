//! Combination rules for stats that do not simply add

use tracing::warn;

/// Margin kept below a diminishing-returns factor when a delta would reach it
const FACTOR_EPSILON: f64 = 1e-6;

/// Multiplicative compounding: `((1 + old/100)(1 + delta/100) - 1) * 100`
pub fn compound(old: f64, delta: f64) -> f64 {
    ((1.0 + old / 100.0) * (1.0 + delta / 100.0) - 1.0) * 100.0
}

/// Exact inverse of [`compound`]
///
/// A delta of -100% or below has no inverse; the value is returned unchanged.
pub fn uncompound(current: f64, delta: f64) -> f64 {
    let divisor = 1.0 + delta / 100.0;
    if divisor <= 0.0 {
        warn!(current, delta, "cannot remove a compounding bonus of -100% or less");
        return current;
    }
    ((1.0 + current / 100.0) / divisor - 1.0) * 100.0
}

/// Diminishing-returns compounding toward `factor`:
/// `(1 - (1 - old/F)(1 - delta/F)) * F`
pub fn diminish(old: f64, delta: f64, factor: f64) -> f64 {
    let delta = clamp_to_factor(delta, factor);
    (1.0 - (1.0 - old / factor) * (1.0 - delta / factor)) * factor
}

/// Inverse of [`diminish`], floored at 0
pub fn undiminish(current: f64, delta: f64, factor: f64) -> f64 {
    let delta = clamp_to_factor(delta, factor);
    let old = (1.0 - (1.0 - current / factor) / (1.0 - delta / factor)) * factor;
    old.max(0.0)
}

/// A delta at or above the factor would zero (or flip) the remaining headroom
fn clamp_to_factor(delta: f64, factor: f64) -> f64 {
    if delta >= factor {
        warn!(delta, factor, "diminishing delta reaches its factor, clamping");
        factor - FACTOR_EPSILON
    } else {
        delta
    }
}
