//! Combination search - ranking catalog lines and line sets by DPS gain

mod equivalence;
mod exhaustive;
mod greedy;

pub use equivalence::{stat_equivalents, StatEquivalent};
pub use exhaustive::{best_combinations, rank_lines, RankedCombination, RankedLine, MAX_LINES};
pub use greedy::{
    greedy_search, run_scenarios, GreedyCandidate, GreedyPick, GreedyResult, GreedyScenario,
};
