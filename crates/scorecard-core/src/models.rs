use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How rounds are placed along the x axis of a performance series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum XAxisMode {
    /// Consecutive round numbers shared by all players.
    Round,
    /// The round's start date.
    Date,
}

/// Player name of the synthetic row that carries the course par.
pub const PAR_PLAYER: &str = "Par";

/// One CSV row exactly as exported: a player's strokes for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRound {
    pub player_name: String,
    pub course_name: String,
    pub layout_name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Total strokes as written by the export (not yet completion-checked).
    pub total: u32,
    /// Score relative to par, when the export filled it in.
    pub plus_minus: Option<i32>,
    /// Round rating, when the export filled it in.
    pub round_rating: Option<f64>,
    /// Strokes per hole in hole order; 0 means the hole was not played.
    pub holes: Vec<u32>,
}

impl RawRound {
    /// Whether this row is the course's par reference rather than a player.
    pub fn is_par(&self) -> bool {
        self.player_name == PAR_PLAYER
    }
}

/// One loaded CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// File the rows were read from.
    pub source: PathBuf,
    /// Number of `HoleN` columns in the header.
    pub hole_count: usize,
    pub rows: Vec<RawRound>,
}

/// A single scored hole: one row per player × round × hole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoleRecord {
    pub player_name: String,
    pub course_name: String,
    pub layout_name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// 1-based hole index.
    pub hole: u32,
    /// Strokes taken; always > 0.
    pub score: u32,
}

/// A player's round with completion-aware total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub player_name: String,
    pub course_name: String,
    pub layout_name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Total strokes, or 0 when any hole is unscored.
    pub total: u32,
    pub plus_minus: Option<i32>,
    pub round_rating: Option<f64>,
    pub holes: Vec<u32>,
}

impl RoundRecord {
    /// A round counts as finished when its total survived the completion check.
    pub fn is_finished(&self) -> bool {
        self.total != 0
    }

    /// Strokes on the 1-based `hole`, if the round has that many holes.
    pub fn hole_score(&self, hole: u32) -> Option<u32> {
        let index = usize::try_from(hole).ok()?.checked_sub(1)?;
        self.holes.get(index).copied()
    }
}

/// Par for one hole of a course layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolePar {
    pub course_name: String,
    pub layout_name: String,
    pub hole: u32,
    pub par: u32,
}

/// Par sequence for a whole course layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundPar {
    pub course_name: String,
    pub layout_name: String,
    pub total: u32,
    pub holes: Vec<u32>,
}

impl RoundPar {
    /// Par of the 1-based `hole`, if the layout has that many holes.
    pub fn hole_par(&self, hole: u32) -> Option<u32> {
        let index = usize::try_from(hole).ok()?.checked_sub(1)?;
        self.holes.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn round(total: u32, holes: Vec<u32>) -> RoundRecord {
        RoundRecord {
            player_name: "Alice".to_string(),
            course_name: "Vipan".to_string(),
            layout_name: "Main".to_string(),
            start_date: ts(),
            end_date: ts(),
            total,
            plus_minus: None,
            round_rating: None,
            holes,
        }
    }

    #[test]
    fn test_raw_round_is_par_is_case_sensitive() {
        let mut raw = RawRound {
            player_name: "Par".to_string(),
            course_name: "Vipan".to_string(),
            layout_name: "Main".to_string(),
            start_date: ts(),
            end_date: ts(),
            total: 27,
            plus_minus: None,
            round_rating: None,
            holes: vec![3; 9],
        };
        assert!(raw.is_par());
        raw.player_name = "par".to_string();
        assert!(!raw.is_par());
    }

    #[test]
    fn test_round_is_finished() {
        assert!(round(10, vec![3, 4, 3]).is_finished());
        assert!(!round(0, vec![3, 0, 3]).is_finished());
    }

    #[test]
    fn test_round_hole_score_is_one_based() {
        let r = round(10, vec![3, 4, 3]);
        assert_eq!(r.hole_score(1), Some(3));
        assert_eq!(r.hole_score(2), Some(4));
        assert_eq!(r.hole_score(0), None);
        assert_eq!(r.hole_score(4), None);
    }

    #[test]
    fn test_round_par_hole_par() {
        let par = RoundPar {
            course_name: "Vipan".to_string(),
            layout_name: "Main".to_string(),
            total: 10,
            holes: vec![3, 4, 3],
        };
        assert_eq!(par.hole_par(2), Some(4));
        assert_eq!(par.hole_par(9), None);
    }
}
