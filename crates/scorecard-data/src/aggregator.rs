//! Round and throw totals, overall and per player.

use std::collections::HashMap;

use scorecard_core::models::{HoleRecord, RoundRecord};
use scorecard_core::stats::{mean, trend_slope};
use serde::Serialize;

// ── RoundSummary ──────────────────────────────────────────────────────────────

/// Summary of a set of rounds and the holes played in them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundSummary {
    /// Rounds played, finished or not.
    pub rounds: usize,
    /// Rounds where every hole has a score.
    pub finished_rounds: usize,
    /// Lowest total of a finished round.
    pub best_total: Option<u32>,
    /// Highest total of a finished round.
    pub worst_total: Option<u32>,
    /// Mean total of finished rounds.
    pub mean_total: Option<f64>,
    /// Least-squares slope of finished totals in date order; negative means
    /// improving.
    pub trend_slope: f64,
    /// Holes with a score.
    pub holes: usize,
    /// Sum of strokes over those holes.
    pub throws: u64,
}

/// Running totals that become a [`RoundSummary`].
#[derive(Debug, Default)]
struct SummaryAccumulator {
    rounds: usize,
    finished_totals: Vec<u32>,
    holes: usize,
    throws: u64,
}

impl SummaryAccumulator {
    /// Rounds must arrive in date order for the trend to be meaningful.
    fn add_round(&mut self, round: &RoundRecord) {
        self.rounds += 1;
        if round.is_finished() {
            self.finished_totals.push(round.total);
        }
    }

    fn add_hole(&mut self, hole: &HoleRecord) {
        self.holes += 1;
        self.throws += u64::from(hole.score);
    }

    fn finish(self) -> RoundSummary {
        let totals: Vec<f64> = self.finished_totals.iter().map(|&t| f64::from(t)).collect();
        RoundSummary {
            rounds: self.rounds,
            finished_rounds: self.finished_totals.len(),
            best_total: self.finished_totals.iter().copied().min(),
            worst_total: self.finished_totals.iter().copied().max(),
            mean_total: mean(&totals),
            trend_slope: trend_slope(&totals),
            holes: self.holes,
            throws: self.throws,
        }
    }
}

// ── SummaryStats ──────────────────────────────────────────────────────────────

/// One player's share of a [`SummaryStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_name: String,
    #[serde(flatten)]
    pub summary: RoundSummary,
}

/// Totals across everyone plus a breakdown per player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub overall: RoundSummary,
    /// Players in order of their first round; players that only appear in
    /// the hole view come last.
    pub players: Vec<PlayerSummary>,
}

/// Summarise filtered `holes` and `rounds`; neither may contain par rows.
pub fn summarize(holes: &[HoleRecord], rounds: &[RoundRecord]) -> SummaryStats {
    let mut sorted: Vec<&RoundRecord> = rounds.iter().collect();
    sorted.sort_by_key(|r| r.start_date);

    let mut overall = SummaryAccumulator::default();
    let mut players: Vec<(String, SummaryAccumulator)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    let mut slot_for = |name: &str, players: &mut Vec<(String, SummaryAccumulator)>| -> usize {
        *slots.entry(name.to_string()).or_insert_with(|| {
            players.push((name.to_string(), SummaryAccumulator::default()));
            players.len() - 1
        })
    };

    for round in sorted {
        overall.add_round(round);
        let slot = slot_for(&round.player_name, &mut players);
        players[slot].1.add_round(round);
    }

    for hole in holes {
        overall.add_hole(hole);
        let slot = slot_for(&hole.player_name, &mut players);
        players[slot].1.add_hole(hole);
    }

    SummaryStats {
        overall: overall.finish(),
        players: players
            .into_iter()
            .map(|(player_name, acc)| PlayerSummary {
                player_name,
                summary: acc.finish(),
            })
            .collect(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
