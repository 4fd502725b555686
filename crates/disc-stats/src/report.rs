//! Plain-text tables for the terminal and JSON output for `-o`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use scorecard_core::formatting::{format_decimal_points, format_points};
use scorecard_core::models::XAxisMode;
use scorecard_data::aggregator::{RoundSummary, SummaryStats};
use scorecard_data::analysis::{HoleStats, PerformanceSeries, ScoreDistribution};
use serde::Serialize;

// ── Output ────────────────────────────────────────────────────────────────────

/// Write `value` as JSON to `output`, or print its text rendering.
pub fn emit<T: Serialize>(
    output: Option<&Path>,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", render(value)),
    }
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

// ── Score distribution ────────────────────────────────────────────────────────

pub fn render_score_distribution(dist: &ScoreDistribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:>7} {:>7}", "Score type", "Count", "Share");
    for c in &dist.counts {
        let _ = writeln!(
            out,
            "{:<24} {:>7} {:>6.1}%",
            c.score_type.label(),
            c.count,
            c.percentage
        );
    }
    let _ = writeln!(out, "{:<24} {:>7}", "Total", dist.total_holes);
    out
}

// ── Hole distribution ─────────────────────────────────────────────────────────

pub fn render_hole_distribution(stats: &[HoleStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4} {:>4} {:>6} {:>4} {:>6} {:>6} {:>6} {:>4} {:>6} {:>6}",
        "Hole", "Par", "Plays", "Min", "Q1", "Median", "Q3", "Max", "Mean", "SD"
    );
    for h in stats {
        let par = h.par.map_or_else(|| "-".to_string(), |p| p.to_string());
        let _ = writeln!(
            out,
            "{:>4} {:>4} {:>6} {:>4} {:>6.2} {:>6.2} {:>6.2} {:>4} {:>6.2} {:>6.2}",
            h.hole,
            par,
            h.attempts,
            h.min,
            h.lower_quartile,
            h.median,
            h.upper_quartile,
            h.max,
            h.mean,
            h.std_dev
        );
    }
    out
}

// ── Performance curve ─────────────────────────────────────────────────────────

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

pub fn render_performance(series: &PerformanceSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} by {}", series.stat, axis_label(series.x_axis));
    if let Some(par) = series.par {
        let _ = writeln!(out, "Par: {}", format_value(par));
    }

    for player in &series.players {
        let _ = writeln!(out);
        match player.average {
            Some(avg) => {
                let _ = writeln!(out, "{} (avg {:.2})", player.player_name, avg);
            }
            None => {
                let _ = writeln!(out, "{}", player.player_name);
            }
        }
        for p in &player.points {
            let x = match series.x_axis {
                XAxisMode::Round => format!("#{}", p.round_number),
                XAxisMode::Date => p.start_date.format("%Y-%m-%d %H:%M").to_string(),
            };
            let _ = writeln!(out, "  {:>16}  {:>6}", x, format_value(p.value));
        }
    }
    out
}

fn axis_label(axis: XAxisMode) -> &'static str {
    match axis {
        XAxisMode::Round => "round",
        XAxisMode::Date => "date",
    }
}

// ── Basic stats ───────────────────────────────────────────────────────────────

fn summary_row(out: &mut String, name: &str, s: &RoundSummary) {
    let _ = writeln!(
        out,
        "{:<20} {:>6} {:>8} {:>6} {:>6} {:>8} {:>7.2} {:>6} {:>7}",
        name,
        s.rounds,
        s.finished_rounds,
        format_points(s.best_total),
        format_points(s.worst_total),
        format_decimal_points(s.mean_total, 1),
        s.trend_slope,
        s.holes,
        s.throws
    );
}

pub fn render_summary(stats: &SummaryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>6} {:>8} {:>6} {:>6} {:>8} {:>7} {:>6} {:>7}",
        "Player", "Rounds", "Finished", "Best", "Worst", "Mean", "Trend", "Holes", "Throws"
    );
    for p in &stats.players {
        summary_row(&mut out, &p.player_name, &p.summary);
    }
    summary_row(&mut out, "All players", &stats.overall);
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
