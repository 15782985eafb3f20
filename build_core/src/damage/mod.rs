//! Damage model - Stat vector to expected damage and DPS

mod calculation;
mod gain;
mod result;

pub use calculation::{compute_damage, damage_reduction_factor};
pub use gain::{DpsGain, EnemyProfile, Objective, Scorer};
pub use result::{DamageRange, DamageResult, Target};

/// Damage formula constants
pub mod constants {
    /// Defense curve constant: reduction factor = C / (C + effective defense)
    pub const DEFENSE_CONSTANT: f64 = 6000.0;

    /// Critical rate cap (percentage points)
    pub const CRIT_RATE_CAP: f64 = 100.0;

    /// Attack speed cap (percentage points)
    pub const ATTACK_SPEED_CAP: f64 = 150.0;
}
