//! Scroll table - slot count, action costs, success rates and rewards

use crate::config::ConfigError;
use crate::types::StatDelta;
use serde::{Deserialize, Serialize};

/// One kind of enchant attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollAction {
    pub id: String,
    pub cost: f64,
    /// Base success chance in percentage points
    pub success_rate: f64,
    /// Stat gains applied on success
    #[serde(default)]
    pub rewards: Vec<StatDelta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTable {
    /// Number of enchant slots per attempt
    pub slots: usize,
    /// Cost of discarding an attempt and starting over
    pub discard_cost: f64,
    /// Success bonus applied to every slot (percentage points)
    #[serde(default)]
    pub global_bonus: f64,
    /// 1-based slot positions that receive `bonus_slot_extra`
    #[serde(default)]
    pub bonus_slots: Vec<usize>,
    #[serde(default)]
    pub bonus_slot_extra: f64,
    /// Hard cap on discards per run
    #[serde(default = "default_max_resets")]
    pub max_resets: u32,
    pub actions: Vec<ScrollAction>,
}

fn default_max_resets() -> u32 {
    10_000
}

impl ScrollTable {
    pub fn action(&self, index: usize) -> Option<&ScrollAction> {
        self.actions.get(index)
    }

    pub fn action_index(&self, id: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.id == id)
    }

    /// Success chance of an action at a 0-based slot, capped to [0, 100]
    pub fn success_rate(&self, action: &ScrollAction, slot: usize) -> f64 {
        let extra = if self.bonus_slots.contains(&(slot + 1)) {
            self.bonus_slot_extra
        } else {
            0.0
        };
        (action.success_rate + self.global_bonus + extra).clamp(0.0, 100.0)
    }

    /// Index of the action with the lowest base success rate
    pub fn riskiest_action(&self) -> Option<usize> {
        (0..self.actions.len()).min_by(|&a, &b| {
            self.actions[a]
                .success_rate
                .total_cmp(&self.actions[b].success_rate)
        })
    }

    /// Index of the action with the highest base success rate
    pub fn safest_action(&self) -> Option<usize> {
        (0..self.actions.len()).max_by(|&a, &b| {
            self.actions[a]
                .success_rate
                .total_cmp(&self.actions[b].success_rate)
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots == 0 {
            return Err(ConfigError::ValidationError(
                "scroll table needs at least one slot".to_string(),
            ));
        }
        if self.actions.is_empty() {
            return Err(ConfigError::ValidationError(
                "scroll table needs at least one action".to_string(),
            ));
        }
        if !self.discard_cost.is_finite() || self.discard_cost < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "invalid discard cost {}",
                self.discard_cost
            )));
        }
        for action in &self.actions {
            if !action.cost.is_finite() || action.cost < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "action '{}' has invalid cost {}",
                    action.id, action.cost
                )));
            }
            if !(0.0..=100.0).contains(&action.success_rate) {
                return Err(ConfigError::ValidationError(format!(
                    "action '{}' success rate {} is outside [0, 100]",
                    action.id, action.success_rate
                )));
            }
        }
        if let Some(bad) = self.bonus_slots.iter().find(|&&s| s == 0 || s > self.slots) {
            return Err(ConfigError::ValidationError(format!(
                "bonus slot {bad} is outside 1..={}",
                self.slots
            )));
        }
        Ok(())
    }
}
