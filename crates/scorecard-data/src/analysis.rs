//! Analyses built on the reshaped views.
//!
//! [`ScorecardSet::load`] runs the loading pipeline once; the functions below
//! take already-filtered rows and return serialisable results for the CLI.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDateTime;
use scorecard_core::classifier::{classify_hole, ParLookup, ScoreType};
use scorecard_core::error::Result;
use scorecard_core::filter::{Filterable, StatColumn};
use scorecard_core::formatting::percentage;
use scorecard_core::models::{HolePar, HoleRecord, RoundPar, RoundRecord, Scorecard, XAxisMode};
use scorecard_core::stats::{mean, percentile, std_dev};
use serde::Serialize;
use tracing::{debug, info};

use crate::par::{split_par, RoundParIndex};
use crate::reader::{load_scorecards, LoadReport};
use crate::reshaper::{reshape_holes, reshape_rounds};

// ── ScorecardSet ──────────────────────────────────────────────────────────────

/// Both views of a scorecard directory with their par tables split off.
#[derive(Debug, Clone)]
pub struct ScorecardSet {
    /// Player holes, one per scored hole.
    pub holes: Vec<HoleRecord>,
    pub hole_pars: Vec<HolePar>,
    /// Player rounds with completion-checked totals.
    pub rounds: Vec<RoundRecord>,
    pub round_pars: Vec<RoundPar>,
    pub report: LoadReport,
}

impl ScorecardSet {
    /// Load every CSV in `dir` and build both views.
    pub fn load(dir: &Path) -> Result<Self> {
        let loaded = load_scorecards(dir)?;
        let set = Self::from_scorecards(&loaded.scorecards, loaded.report);
        info!(
            "Loaded {} rounds and {} holes from {} files ({} skipped)",
            set.rounds.len(),
            set.holes.len(),
            set.report.loaded.len(),
            set.report.failures.len()
        );
        Ok(set)
    }

    pub fn from_scorecards(cards: &[Scorecard], report: LoadReport) -> Self {
        let (holes, hole_pars) = split_par(reshape_holes(cards));
        let (rounds, round_pars) = split_par(reshape_rounds(cards));
        Self {
            holes,
            hole_pars,
            rounds,
            round_pars,
            report,
        }
    }
}

// ── Score distribution ────────────────────────────────────────────────────────

/// How often one score type occurred.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTypeCount {
    pub score_type: ScoreType,
    pub count: usize,
    /// Share of all classified holes, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    /// Worst score type first; types that never occurred are left out.
    pub counts: Vec<ScoreTypeCount>,
    pub total_holes: usize,
}

/// Classify every hole against `pars` and count the results.
///
/// Fails on the first hole whose layout has no par.
pub fn score_distribution<P: ParLookup + ?Sized>(
    holes: &[HoleRecord],
    pars: &P,
) -> Result<ScoreDistribution> {
    let mut counts: BTreeMap<ScoreType, usize> = BTreeMap::new();
    for hole in holes {
        *counts.entry(classify_hole(hole, pars)?).or_default() += 1;
    }

    let total = holes.len();
    let counts = ScoreType::ALL
        .iter()
        .rev()
        .filter_map(|t| {
            let count = counts.get(t).copied().unwrap_or(0);
            (count > 0).then(|| ScoreTypeCount {
                score_type: *t,
                count,
                percentage: percentage(count as f64, total as f64, 1),
            })
        })
        .collect();

    Ok(ScoreDistribution {
        counts,
        total_holes: total,
    })
}

// ── Hole distribution ─────────────────────────────────────────────────────────

/// Spread of scores on one hole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleStats {
    pub hole: u32,
    pub attempts: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub median: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    pub std_dev: f64,
    pub par: Option<u32>,
}

/// Per-hole score statistics, ordered by hole number.
///
/// `holes` and `pars` should already be narrowed to one layout; when `pars`
/// lists a hole twice the first value is used.
pub fn hole_distribution(holes: &[HoleRecord], pars: &[HolePar]) -> Vec<HoleStats> {
    let mut by_hole: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for h in holes {
        by_hole.entry(h.hole).or_default().push(h.score);
    }

    by_hole
        .into_iter()
        .map(|(hole, mut scores)| {
            scores.sort_unstable();
            let values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
            HoleStats {
                hole,
                attempts: scores.len(),
                min: scores[0],
                max: scores[scores.len() - 1],
                mean: mean(&values).unwrap_or(0.0),
                median: percentile(&values, 50.0),
                lower_quartile: percentile(&values, 25.0),
                upper_quartile: percentile(&values, 75.0),
                std_dev: std_dev(&values),
                par: pars.iter().find(|p| p.hole == hole).map(|p| p.par),
            }
        })
        .collect()
}

// ── Performance series ────────────────────────────────────────────────────────

/// One round of one player on the curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    /// 1-based position of the round's start time among all rounds shown.
    pub round_number: usize,
    pub start_date: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeries {
    pub player_name: String,
    /// Points in date order.
    pub points: Vec<PerformancePoint>,
    pub average: Option<f64>,
}

/// A stat followed round by round for every player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSeries {
    pub stat: StatColumn,
    pub x_axis: XAxisMode,
    pub players: Vec<PlayerSeries>,
    /// The stat's value on the layout's par row.
    pub par: Option<f64>,
}

/// Follow `stat` across `rounds` for each player.
///
/// Rounds that started at the same moment share a round number, so players
/// on the same card line up. Rounds without a value for `stat` are skipped;
/// callers normally drop them beforehand with a non-zero filter. The par
/// line comes from the `(course, layout)` entry of `pars`.
pub fn performance_series(
    rounds: &[RoundRecord],
    pars: &RoundParIndex,
    (course, layout): (&str, &str),
    stat: StatColumn,
    x_axis: XAxisMode,
) -> PerformanceSeries {
    let starts: BTreeSet<NaiveDateTime> = rounds.iter().map(|r| r.start_date).collect();
    let round_number = |start: NaiveDateTime| starts.range(..start).count() + 1;

    let mut sorted: Vec<&RoundRecord> = rounds.iter().collect();
    sorted.sort_by_key(|r| r.start_date);

    let mut players: Vec<PlayerSeries> = Vec::new();
    for round in sorted {
        let Some(value) = round.stat_value(stat) else {
            continue;
        };
        let point = PerformancePoint {
            round_number: round_number(round.start_date),
            start_date: round.start_date,
            value,
        };
        match players.iter_mut().find(|p| p.player_name == round.player_name) {
            Some(series) => series.points.push(point),
            None => players.push(PlayerSeries {
                player_name: round.player_name.clone(),
                points: vec![point],
                average: None,
            }),
        }
    }

    for series in &mut players {
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        series.average = mean(&values);
    }

    let par = pars
        .find(course, layout)
        .and_then(|p| p.stat_value(stat))
        .filter(|v| *v != 0.0);
    debug!(
        "{} series: {} players over {} rounds, par {:?}",
        stat,
        players.len(),
        starts.len(),
        par
    );

    PerformanceSeries {
        stat,
        x_axis,
        players,
        par,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
