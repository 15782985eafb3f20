//! Plain-text rendering of a run report

use crate::RunReport;
use build_core::DamageResult;
use std::fmt::Write;

fn separator(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "=".repeat(60));
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}\n", "=".repeat(60));
}

fn damage_block(out: &mut String, label: &str, result: &DamageResult) {
    let _ = writeln!(out, "  {} DPS: {:.1}", label, result.dps);
    let _ = writeln!(
        out,
        "    Non-crit {:.0}-{:.0} (avg {:.0}), crit {:.0}-{:.0} (avg {:.0})",
        result.non_crit.min,
        result.non_crit.max,
        result.non_crit.avg,
        result.crit.min,
        result.crit.max,
        result.crit.avg
    );
    let _ = writeln!(
        out,
        "    Defense x{:.4}  Amp x{:.3}  Speed x{:.3}  Final x{:.3}",
        result.damage_reduction,
        result.damage_amp_multiplier,
        result.attack_speed_multiplier,
        result.final_damage_multiplier
    );
}

/// Render every section present in the report
pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario: {}", report.scenario);

    if let Some(damage) = &report.damage {
        separator(&mut out, "DAMAGE");
        damage_block(&mut out, "Boss", &damage.boss);
        damage_block(&mut out, "Normal", &damage.normal);

        let _ = writeln!(out, "\n  Stat                      Gain/pt   = 1% attack");
        for eq in &damage.equivalents {
            if let Some(units) = eq.units_per_attack_percent {
                let _ = writeln!(
                    out,
                    "  {:<24} {:>8.4}%   {:>8.2}",
                    eq.stat.label(),
                    eq.gain_per_unit,
                    units
                );
            }
        }
    }

    if let Some(scrolls) = &report.scroll {
        separator(&mut out, "SCROLL STRATEGIES");
        for s in scrolls {
            let _ = writeln!(
                out,
                "  {:<44} {:>7.2}% (p10 {:.2}%, p90 {:.2}%)",
                s.strategy, s.avg_gain, s.distribution.p10, s.distribution.p90
            );
            let _ = writeln!(
                out,
                "    attack +{:.1}  amp +{:.2}%  successes {:.2}  resets {:.2}  spent {:.1}/{:.1}",
                s.avg_attack, s.avg_damage_amp, s.avg_successes, s.avg_resets, s.avg_spent, s.budget
            );
            if s.needs_more_budget() {
                let _ = writeln!(out, "    every run ran out of budget: needs more budget");
            } else if s.unfunded_runs > 0 {
                let _ = writeln!(
                    out,
                    "    {:.1}% of runs ran out of budget",
                    s.unfunded_rate() * 100.0
                );
            }
        }
    }

    if let Some(cubes) = &report.cube {
        separator(&mut out, "CUBE STRATEGIES");
        for c in cubes {
            let d = &c.distribution;
            let _ = writeln!(
                out,
                "  {:<44} mean {:>7.2}%  min {:.2}%  p10 {:.2}%  p50 {:.2}%  p90 {:.2}%  max {:.2}%",
                c.strategy, c.avg_gain, d.min, d.p10, d.p50, d.p90, d.max
            );
            let rarities: Vec<String> = c
                .rarity_counts
                .iter()
                .map(|(rarity, count)| format!("{rarity} {count}"))
                .collect();
            let _ = writeln!(out, "    final rarities: {}", rarities.join(", "));
        }
    }

    if let Some(ranked) = &report.ranking {
        separator(&mut out, "LINE RANKING");
        for (i, line) in ranked.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<10} L{} {:<36} boss +{:.1}  normal +{:.1}  ({:+.2}%)",
                i + 1,
                line.rarity.to_string(),
                line.line,
                line.description,
                line.boss_dps_gain,
                line.normal_dps_gain,
                line.percent_change
            );
        }
    }

    if let Some(combos) = &report.combinations {
        let _ = writeln!(out, "\n  Best combinations:");
        for combo in combos {
            let _ = writeln!(
                out,
                "    {:+.2}%  {}",
                combo.gain.percent_change,
                combo.description()
            );
        }
    }

    if let Some(results) = &report.greedy {
        separator(&mut out, "GREEDY SEARCH (heuristic)");
        for result in results {
            let _ = writeln!(
                out,
                "  {}: {} lines, {:+.2}%",
                result.scenario,
                result.picks.len(),
                result.total.percent_change
            );
            for pick in &result.picks {
                let _ = writeln!(
                    out,
                    "    {:>2}. {:<48} +{:.3}%",
                    pick.step + 1,
                    pick.description,
                    pick.marginal_gain
                );
            }
        }
    }

    out
}
