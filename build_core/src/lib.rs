//! build_core - Damage model and build optimizers for character stat planning
//!
//! This library provides:
//! - StatVector: The closed set of combat stats a character carries
//! - compute_damage: Expected damage and DPS against a boss or normal target
//! - StatAdjuster: Adding and removing stats with the right algebra
//! - Scroll engine: Enchant attempts with discard-and-retry strategies
//! - Cube engine: Rarity promotion and line rerolls across many slots
//! - Search: Exhaustive and greedy ranking of stat lines

pub mod adjust;
pub mod batch;
pub mod config;
pub mod cube;
pub mod damage;
pub mod lines;
pub mod prelude;
pub mod scroll;
pub mod search;
pub mod stat_vector;
pub mod types;

// Re-export core types for convenience
pub use adjust::{ClassContext, StatAdjuster};
pub use batch::{BatchError, BatchOptions, BatchRunner, CancelToken, Distribution};
pub use config::{ConfigError, GameConstants};
pub use cube::{CubeCatalog, CubeStrategy, CubeSummary, SimulationCache};
pub use damage::{compute_damage, DamageResult, DpsGain, EnemyProfile, Objective, Scorer, Target};
pub use lines::{LineCatalog, LineTable, StatLineOption};
pub use scroll::{ScrollStrategy, ScrollSummary, ScrollTable};
pub use search::{best_combinations, greedy_search, rank_lines, stat_equivalents, RankedLine};
pub use stat_vector::{InputIssue, StatVector};
pub use types::{MonsterClass, Rarity, SlotId, StatDelta, StatKind};
