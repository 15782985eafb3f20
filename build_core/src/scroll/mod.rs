//! Scroll trials - budgeted enchant attempts with discard-and-retry
//!
//! One attempt walks the table's slots in order, paying for one action per
//! slot and collecting its reward on success. A strategy may discard a
//! finished attempt (paying the discard cost) and start again with whatever
//! budget remains. Running out of budget mid-attempt is an outcome, not an
//! error: the remaining slots are marked unfunded.

mod engine;
mod strategy;
mod table;

pub use engine::{
    compare_strategies, run_attempt, run_scroll, simulate_strategy, AttemptResult, AttemptStatus,
    RunOutcome, ScrollSummary, SlotResult,
};
pub use strategy::{ScrollPolicy, ScrollStrategy, SlotContext};
pub use table::{ScrollAction, ScrollTable};
