use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScorecardError};
use crate::models::HoleRecord;

/// Named result of a hole relative to its par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreType {
    #[serde(rename = "Hole-in-one")]
    HoleInOne,
    Condor,
    Albatross,
    Eagle,
    Birdie,
    Par,
    Bogey,
    #[serde(rename = "Double Bogey")]
    DoubleBogey,
    #[serde(rename = "Triple Bogey")]
    TripleBogey,
    #[serde(rename = "Worse than triple bogey")]
    WorseThanTripleBogey,
}

impl ScoreType {
    /// Every score type from best to worst.
    pub const ALL: [ScoreType; 10] = [
        ScoreType::HoleInOne,
        ScoreType::Condor,
        ScoreType::Albatross,
        ScoreType::Eagle,
        ScoreType::Birdie,
        ScoreType::Par,
        ScoreType::Bogey,
        ScoreType::DoubleBogey,
        ScoreType::TripleBogey,
        ScoreType::WorseThanTripleBogey,
    ];

    /// 0 for a hole-in-one up to 9 for worse than triple bogey.
    pub fn severity(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreType::HoleInOne => "Hole-in-one",
            ScoreType::Condor => "Condor",
            ScoreType::Albatross => "Albatross",
            ScoreType::Eagle => "Eagle",
            ScoreType::Birdie => "Birdie",
            ScoreType::Par => "Par",
            ScoreType::Bogey => "Bogey",
            ScoreType::DoubleBogey => "Double Bogey",
            ScoreType::TripleBogey => "Triple Bogey",
            ScoreType::WorseThanTripleBogey => "Worse than triple bogey",
        }
    }

    /// Map a signed `score - par` difference to a score type.
    ///
    /// Differences below -4 can only happen on par 7+ holes and are
    /// reported as a condor.
    pub fn from_relative(diff: i64) -> Self {
        match diff {
            i64::MIN..=-4 => ScoreType::Condor,
            -3 => ScoreType::Albatross,
            -2 => ScoreType::Eagle,
            -1 => ScoreType::Birdie,
            0 => ScoreType::Par,
            1 => ScoreType::Bogey,
            2 => ScoreType::DoubleBogey,
            3 => ScoreType::TripleBogey,
            _ => ScoreType::WorseThanTripleBogey,
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `score` strokes on a hole whose par is `par`.
///
/// An ace is always [`ScoreType::HoleInOne`], whatever the par. A score of 0
/// marks an unplayed hole and is rejected.
pub fn classify(score: u32, par: u32) -> Result<ScoreType> {
    match score {
        0 => Err(ScorecardError::InvalidScore(score)),
        1 => Ok(ScoreType::HoleInOne),
        _ => Ok(ScoreType::from_relative(i64::from(score) - i64::from(par))),
    }
}

/// Source of par values keyed by course, layout and hole.
pub trait ParLookup {
    /// Par of `hole` on the given layout, or
    /// [`ScorecardError::MissingParReference`] when no par row covers it.
    fn hole_par(&self, course: &str, layout: &str, hole: u32) -> Result<u32>;
}

/// Classify a scored hole against the par found in `pars`.
pub fn classify_hole<P: ParLookup + ?Sized>(record: &HoleRecord, pars: &P) -> Result<ScoreType> {
    let par = pars.hole_par(&record.course_name, &record.layout_name, record.hole)?;
    classify(record.score, par)
}
