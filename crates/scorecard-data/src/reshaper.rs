//! Turn wide scorecard rows into the hole-level and round-level views.

use scorecard_core::models::{HoleRecord, RawRound, RoundRecord, Scorecard};
use tracing::debug;

// ── Hole view ─────────────────────────────────────────────────────────────────

/// One [`HoleRecord`] per scored hole of every row in `card`.
///
/// Unplayed holes (score 0) produce no record. Par rows are melted like any
/// other row so the par table can be split off afterwards.
pub fn melt_holes(card: &Scorecard) -> Vec<HoleRecord> {
    card.rows.iter().flat_map(melt_row).collect()
}

fn melt_row(row: &RawRound) -> impl Iterator<Item = HoleRecord> + '_ {
    (1u32..)
        .zip(row.holes.iter())
        .filter(|(_, score)| **score > 0)
        .map(move |(hole, &score)| HoleRecord {
            player_name: row.player_name.clone(),
            course_name: row.course_name.clone(),
            layout_name: row.layout_name.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            hole,
            score,
        })
}

/// Hole view of every scorecard, concatenated in file order.
pub fn reshape_holes(cards: &[Scorecard]) -> Vec<HoleRecord> {
    let holes: Vec<HoleRecord> = cards.iter().flat_map(melt_holes).collect();
    debug!("Hole view: {} records from {} files", holes.len(), cards.len());
    holes
}

// ── Round view ────────────────────────────────────────────────────────────────

/// One [`RoundRecord`] per row of `card`, with the total zeroed for any row
/// that has an unplayed hole.
pub fn complete_rounds(card: &Scorecard) -> Vec<RoundRecord> {
    card.rows.iter().map(complete_row).collect()
}

fn complete_row(row: &RawRound) -> RoundRecord {
    let finished = row.holes.iter().all(|&score| score != 0);
    RoundRecord {
        player_name: row.player_name.clone(),
        course_name: row.course_name.clone(),
        layout_name: row.layout_name.clone(),
        start_date: row.start_date,
        end_date: row.end_date,
        total: if finished { row.total } else { 0 },
        plus_minus: row.plus_minus,
        round_rating: row.round_rating,
        holes: row.holes.clone(),
    }
}

/// Round view of every scorecard, concatenated in file order.
pub fn reshape_rounds(cards: &[Scorecard]) -> Vec<RoundRecord> {
    let rounds: Vec<RoundRecord> = cards.iter().flat_map(complete_rounds).collect();
    let unfinished = rounds.iter().filter(|r| !r.is_finished()).count();
    debug!(
        "Round view: {} records ({} unfinished) from {} files",
        rounds.len(),
        unfinished,
        cards.len()
    );
    rounds
}

// ── Tests ─────────────────────────────────────────────────────────────────────
