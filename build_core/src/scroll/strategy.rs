//! Scroll strategies - which action to take per slot, and when to start over

use super::engine::AttemptResult;
use super::table::ScrollTable;
use serde::{Deserialize, Serialize};

/// What a strategy sees when choosing the action for one slot
#[derive(Debug, Clone, Copy)]
pub struct SlotContext {
    /// 0-based slot position within the attempt
    pub slot: usize,
    pub successes: u32,
    pub failures: u32,
    /// Resource spent so far in the whole run (all attempts and discards)
    pub spent: f64,
    pub budget: f64,
}

impl SlotContext {
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }
}

/// Decision policy for a scroll run
pub trait ScrollPolicy {
    /// Short label for reports
    fn name(&self, table: &ScrollTable) -> String;

    /// Index into `table.actions` for the next slot
    fn choose_action(&self, ctx: &SlotContext) -> usize;

    /// Whether to throw away a finished attempt and start over
    fn should_discard(&self, attempt: &AttemptResult, spent: f64, budget: f64) -> bool;
}

/// Built-in strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollStrategy {
    /// Same action on every slot, never discard
    Fixed { action: usize },
    /// Same action on every slot, discard attempts with too few successes
    DiscardBelow { action: usize, min_successes: u32 },
    /// Risky action until `max_failures` failures, then the safe one
    SafeAfterFailures {
        risky: usize,
        safe: usize,
        max_failures: u32,
    },
    /// Risky action while more than `reserve_pct` of the budget remains
    BudgetReserve {
        risky: usize,
        safe: usize,
        reserve_pct: f64,
    },
}

impl ScrollStrategy {
    /// One of each strategy for a table: a fixed strategy per action plus
    /// the mixed strategies built from its riskiest and safest actions
    pub fn standard_set(table: &ScrollTable) -> Vec<ScrollStrategy> {
        let mut strategies: Vec<ScrollStrategy> = (0..table.actions.len())
            .map(|action| ScrollStrategy::Fixed { action })
            .collect();

        if let (Some(risky), Some(safe)) = (table.riskiest_action(), table.safest_action()) {
            strategies.push(ScrollStrategy::DiscardBelow {
                action: risky,
                min_successes: table.slots.div_ceil(2) as u32,
            });
            if risky != safe {
                strategies.push(ScrollStrategy::SafeAfterFailures {
                    risky,
                    safe,
                    max_failures: 2,
                });
                strategies.push(ScrollStrategy::BudgetReserve {
                    risky,
                    safe,
                    reserve_pct: 30.0,
                });
            }
        }

        strategies
    }
}

fn action_id(table: &ScrollTable, index: usize) -> &str {
    table.action(index).map_or("?", |a| a.id.as_str())
}

impl ScrollPolicy for ScrollStrategy {
    fn name(&self, table: &ScrollTable) -> String {
        match *self {
            ScrollStrategy::Fixed { action } => format!("always {}", action_id(table, action)),
            ScrollStrategy::DiscardBelow {
                action,
                min_successes,
            } => format!(
                "{} and discard below {} successes",
                action_id(table, action),
                min_successes
            ),
            ScrollStrategy::SafeAfterFailures {
                risky,
                safe,
                max_failures,
            } => format!(
                "{} until {} failures, then {}",
                action_id(table, risky),
                max_failures,
                action_id(table, safe)
            ),
            ScrollStrategy::BudgetReserve {
                risky,
                safe,
                reserve_pct,
            } => format!(
                "{} above {}% budget, then {}",
                action_id(table, risky),
                reserve_pct,
                action_id(table, safe)
            ),
        }
    }

    fn choose_action(&self, ctx: &SlotContext) -> usize {
        match *self {
            ScrollStrategy::Fixed { action } | ScrollStrategy::DiscardBelow { action, .. } => {
                action
            }
            ScrollStrategy::SafeAfterFailures {
                risky,
                safe,
                max_failures,
            } => {
                if ctx.failures < max_failures {
                    risky
                } else {
                    safe
                }
            }
            ScrollStrategy::BudgetReserve {
                risky,
                safe,
                reserve_pct,
            } => {
                if ctx.remaining() > ctx.budget * reserve_pct / 100.0 {
                    risky
                } else {
                    safe
                }
            }
        }
    }

    fn should_discard(&self, attempt: &AttemptResult, _spent: f64, _budget: f64) -> bool {
        match *self {
            ScrollStrategy::DiscardBelow { min_successes, .. } => {
                attempt.successes < min_successes
            }
            _ => false,
        }
    }
}
