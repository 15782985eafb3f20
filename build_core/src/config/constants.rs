//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable per-class conversion constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConstants {
    /// Attack per main stat for classes missing from the table
    #[serde(default = "default_attack_per_main_stat")]
    pub default_attack_per_main_stat: f64,
    #[serde(default)]
    pub classes: Vec<ClassConstants>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConstants {
    pub name: String,
    #[serde(default = "default_attack_per_main_stat")]
    pub attack_per_main_stat: f64,
    /// Main stat granted per point of defense
    #[serde(default)]
    pub defense_to_main_stat: f64,
}

impl GameConstants {
    /// Look up a class by name (case-insensitive)
    pub fn class(&self, name: &str) -> Option<&ClassConstants> {
        self.classes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl Default for GameConstants {
    fn default() -> Self {
        let toml = include_str!("../../config/constants.toml");
        super::parse_toml(toml, "class constants").unwrap_or_else(|_| GameConstants {
            default_attack_per_main_stat: default_attack_per_main_stat(),
            classes: Vec::new(),
        })
    }
}

fn default_attack_per_main_stat() -> f64 {
    0.25
}
