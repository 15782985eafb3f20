//! Cube simulation - probabilistic potential upgrades across many slots
//!
//! Each slot climbs a rarity ladder and carries three rolled lines. One cube
//! rolls for promotion to the next rarity and then re-rolls all three lines
//! from the weighted tables for the slot's (possibly new) rarity. A strategy
//! decides which slot receives each cube of the budget.
//!
//! Weighted tables are resolved once per batch into a [`SimulationCache`];
//! building it is a precondition of every simulation call.

mod cache;
mod catalog;
mod engine;
mod strategy;

pub use cache::SimulationCache;
pub use catalog::{CubeCatalog, RarityTier, SlotLineTable};
pub use engine::{
    compare_cube_strategies, run_cubes, simulate_cubes, CubeRun, CubeSummary, SlotState,
};
pub use strategy::{CubeStrategy, SlotPolicy, SlotView};
