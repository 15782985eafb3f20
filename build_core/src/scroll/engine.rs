//! Scroll engine - attempts, discards and batch aggregation

use super::strategy::{ScrollPolicy, SlotContext};
use super::table::ScrollTable;
use crate::adjust::StatAdjuster;
use crate::batch::{BatchError, BatchRunner, Distribution};
use crate::damage::Scorer;
use crate::stat_vector::StatVector;
use crate::types::StatDelta;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What happened at one slot of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotResult {
    Success { action: usize },
    Failure { action: usize },
    /// Not attempted: the remaining budget could not pay for the action
    Unfunded,
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    /// Every slot was paid for
    Complete,
    /// Budget ran out; `first_slot` and every later slot are unfunded
    Unfunded { first_slot: usize },
}

/// One pass over every slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub slots: Vec<SlotResult>,
    pub successes: u32,
    pub failures: u32,
    /// Spent during this attempt only
    pub spent: f64,
    /// Summed raw rewards of successful slots, for reporting totals
    pub reward: StatVector,
    /// Every reward delta of the successful slots, in slot order
    pub rewards: Vec<StatDelta>,
    pub status: AttemptStatus,
}

impl AttemptResult {
    fn new(slots: usize) -> Self {
        AttemptResult {
            slots: Vec::with_capacity(slots),
            successes: 0,
            failures: 0,
            spent: 0.0,
            reward: StatVector::zero(),
            rewards: Vec::new(),
            status: AttemptStatus::Complete,
        }
    }

    pub fn is_unfunded(&self) -> bool {
        matches!(self.status, AttemptStatus::Unfunded { .. })
    }
}

/// Final result of a run: the accepted attempt plus run-level totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub attempt: AttemptResult,
    /// Spent across every attempt and discard of the run
    pub spent: f64,
    pub resets: u32,
    /// The strategy wanted to discard the final attempt but could not pay
    pub discard_denied: bool,
}

impl RunOutcome {
    pub fn reward(&self) -> &StatVector {
        &self.attempt.reward
    }

    /// Base stats with each successful reward applied in turn
    pub fn apply_to(&self, base: &StatVector, adjuster: &StatAdjuster) -> StatVector {
        adjuster.apply_all(base, &self.attempt.rewards)
    }

    pub fn is_unfunded(&self) -> bool {
        self.attempt.is_unfunded()
    }
}

/// Walk every slot once. `already_spent` is the run's spend before this
/// attempt; the attempt never takes the run total above `budget`.
pub fn run_attempt<P, R>(
    table: &ScrollTable,
    policy: &P,
    already_spent: f64,
    budget: f64,
    rng: &mut R,
) -> AttemptResult
where
    P: ScrollPolicy + ?Sized,
    R: Rng,
{
    let mut attempt = AttemptResult::new(table.slots);

    for slot in 0..table.slots {
        let ctx = SlotContext {
            slot,
            successes: attempt.successes,
            failures: attempt.failures,
            spent: already_spent + attempt.spent,
            budget,
        };

        let chosen = policy.choose_action(&ctx);
        let picked = match table.action(chosen) {
            Some(action) => Some((chosen, action)),
            None => {
                warn!(chosen, "strategy chose an unknown action, using the first");
                table.actions.first().map(|action| (0, action))
            }
        };

        let funded = picked.filter(|(_, action)| ctx.spent + action.cost <= budget);
        let Some((index, action)) = funded else {
            attempt.status = AttemptStatus::Unfunded { first_slot: slot };
            attempt
                .slots
                .extend(std::iter::repeat(SlotResult::Unfunded).take(table.slots - slot));
            break;
        };

        attempt.spent += action.cost;
        let chance = table.success_rate(action, slot);
        if rng.gen::<f64>() * 100.0 < chance {
            attempt.successes += 1;
            for reward in &action.rewards {
                attempt.reward.add_raw(*reward);
                attempt.rewards.push(*reward);
            }
            attempt.slots.push(SlotResult::Success { action: index });
        } else {
            attempt.failures += 1;
            attempt.slots.push(SlotResult::Failure { action: index });
        }
    }

    attempt
}

/// Run attempts until the strategy accepts one or a discard cannot be paid
pub fn run_scroll<P, R>(table: &ScrollTable, policy: &P, budget: f64, rng: &mut R) -> RunOutcome
where
    P: ScrollPolicy + ?Sized,
    R: Rng,
{
    let mut spent = 0.0;
    let mut resets = 0;

    loop {
        let attempt = run_attempt(table, policy, spent, budget, rng);
        spent += attempt.spent;

        let wants_discard = policy.should_discard(&attempt, spent, budget);
        let can_discard = spent + table.discard_cost <= budget && resets < table.max_resets;

        if wants_discard && can_discard {
            spent += table.discard_cost;
            resets += 1;
            continue;
        }

        return RunOutcome {
            attempt,
            spent,
            resets,
            discard_denied: wants_discard,
        };
    }
}

/// Aggregate performance of one strategy over a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSummary {
    pub strategy: String,
    pub budget: f64,
    pub runs: usize,
    /// Mean DPS gain in percent
    pub avg_gain: f64,
    pub avg_attack: f64,
    pub avg_damage_amp: f64,
    pub avg_successes: f64,
    pub avg_resets: f64,
    pub avg_spent: f64,
    /// Runs whose accepted attempt ran out of budget
    pub unfunded_runs: usize,
    pub distribution: Distribution,
    pub samples: Vec<f64>,
}

impl ScrollSummary {
    /// Every run ran out of budget before finishing an attempt
    pub fn needs_more_budget(&self) -> bool {
        self.runs > 0 && self.unfunded_runs == self.runs
    }

    pub fn unfunded_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.unfunded_runs as f64 / self.runs as f64
        }
    }
}

/// Simulate a strategy over a batch and score each run's reward
pub fn simulate_strategy<P, F>(
    table: &ScrollTable,
    policy: &P,
    budget: f64,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    runner: &BatchRunner,
    progress: F,
) -> Result<ScrollSummary, BatchError>
where
    P: ScrollPolicy + Sync + ?Sized,
    F: FnMut(usize, usize),
{
    let outcomes = runner.run(
        |_, rng| {
            let outcome = run_scroll(table, policy, budget, rng);
            let gain = scorer.gain_percent(&outcome.apply_to(scorer.base(), adjuster));
            (outcome, gain)
        },
        progress,
    )?;

    let runs = outcomes.len();
    let n = runs.max(1) as f64;
    let mean = |f: &dyn Fn(&RunOutcome) -> f64| outcomes.iter().map(|(o, _)| f(o)).sum::<f64>() / n;

    let samples: Vec<f64> = outcomes.iter().map(|(_, gain)| *gain).collect();
    let summary = ScrollSummary {
        strategy: policy.name(table),
        budget,
        runs,
        avg_gain: samples.iter().sum::<f64>() / n,
        avg_attack: mean(&|o: &RunOutcome| o.reward().attack),
        avg_damage_amp: mean(&|o: &RunOutcome| o.reward().damage_amp),
        avg_successes: mean(&|o: &RunOutcome| f64::from(o.attempt.successes)),
        avg_resets: mean(&|o: &RunOutcome| f64::from(o.resets)),
        avg_spent: mean(&|o: &RunOutcome| o.spent),
        unfunded_runs: outcomes.iter().filter(|(o, _)| o.is_unfunded()).count(),
        distribution: Distribution::from_samples(&samples),
        samples,
    };

    debug!(
        strategy = %summary.strategy,
        avg_gain = summary.avg_gain,
        unfunded = summary.unfunded_runs,
        "scroll strategy simulated"
    );
    Ok(summary)
}

/// Simulate several strategies with the same batch settings.
/// Progress is reported as strategies completed.
pub fn compare_strategies<P, F>(
    table: &ScrollTable,
    policies: &[P],
    budget: f64,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    runner: &BatchRunner,
    mut progress: F,
) -> Result<Vec<ScrollSummary>, BatchError>
where
    P: ScrollPolicy + Sync,
    F: FnMut(usize, usize),
{
    let total = policies.len();
    let mut summaries = Vec::with_capacity(total);
    for (i, policy) in policies.iter().enumerate() {
        summaries.push(simulate_strategy(
            table,
            policy,
            budget,
            scorer,
            adjuster,
            runner,
            |_, _| {},
        )?);
        progress(i + 1, total);
    }
    Ok(summaries)
}
