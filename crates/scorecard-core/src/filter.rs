//! Composable row filters shared by every scorecard table.
//!
//! Predicates are applied in a fixed order (course, layout, players, after,
//! before, stat) so that the per-stage diagnostics always read the same way.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, ScorecardError};
use crate::models::{HolePar, HoleRecord, RoundPar, RoundRecord};

// ── StatColumn ────────────────────────────────────────────────────────────────

/// A numeric column that can be required non-zero or plotted over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatColumn {
    Total,
    Score,
    PlusMinus,
    RoundRating,
    /// Strokes on the given 1-based hole.
    Hole(u32),
}

impl FromStr for StatColumn {
    type Err = ScorecardError;

    /// Case-insensitive: `Total`, `Score`, `PlusMinus` (or `+/-`),
    /// `RoundRating`, `Hole<N>` with N ≥ 1.
    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_lowercase();
        match lowered.as_str() {
            "total" => return Ok(StatColumn::Total),
            "score" => return Ok(StatColumn::Score),
            "plusminus" | "+/-" => return Ok(StatColumn::PlusMinus),
            "roundrating" => return Ok(StatColumn::RoundRating),
            _ => {}
        }

        let re = Regex::new(r"^hole(\d+)$").expect("regex is valid");
        re.captures(&lowered)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .filter(|hole| *hole >= 1)
            .map(StatColumn::Hole)
            .ok_or_else(|| {
                ScorecardError::InvalidConfiguration(format!("unknown stat column '{}'", value))
            })
    }
}

impl fmt::Display for StatColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatColumn::Total => f.write_str("Total"),
            StatColumn::Score => f.write_str("Score"),
            StatColumn::PlusMinus => f.write_str("PlusMinus"),
            StatColumn::RoundRating => f.write_str("RoundRating"),
            StatColumn::Hole(h) => write!(f, "Hole{}", h),
        }
    }
}

impl StatColumn {
    /// Reject columns that only exist in the hole view.
    pub fn require_round_stat(self) -> Result<Self> {
        match self {
            StatColumn::Score => Err(ScorecardError::InvalidConfiguration(
                "stat 'Score' only exists per hole; use Total or Hole<N> for rounds".to_string(),
            )),
            other => Ok(other),
        }
    }
}

// ── Filterable ────────────────────────────────────────────────────────────────

/// Interface for any table row the filter chain can inspect.
///
/// Rows without a player or a date (par references) return `None` and are
/// never excluded by the player or date predicates.
pub trait Filterable {
    fn course_name(&self) -> &str;
    fn layout_name(&self) -> &str;
    fn player_name(&self) -> Option<&str>;
    fn start_date(&self) -> Option<NaiveDateTime>;
    /// Value of `stat` for this row, or `None` when the row has no such column.
    fn stat_value(&self, stat: StatColumn) -> Option<f64>;
}

impl Filterable for HoleRecord {
    fn course_name(&self) -> &str {
        &self.course_name
    }

    fn layout_name(&self) -> &str {
        &self.layout_name
    }

    fn player_name(&self) -> Option<&str> {
        Some(&self.player_name)
    }

    fn start_date(&self) -> Option<NaiveDateTime> {
        Some(self.start_date)
    }

    fn stat_value(&self, stat: StatColumn) -> Option<f64> {
        match stat {
            StatColumn::Score => Some(f64::from(self.score)),
            StatColumn::Hole(h) if h == self.hole => Some(f64::from(self.score)),
            _ => None,
        }
    }
}

impl Filterable for RoundRecord {
    fn course_name(&self) -> &str {
        &self.course_name
    }

    fn layout_name(&self) -> &str {
        &self.layout_name
    }

    fn player_name(&self) -> Option<&str> {
        Some(&self.player_name)
    }

    fn start_date(&self) -> Option<NaiveDateTime> {
        Some(self.start_date)
    }

    fn stat_value(&self, stat: StatColumn) -> Option<f64> {
        match stat {
            StatColumn::Total => Some(f64::from(self.total)),
            StatColumn::PlusMinus => self.plus_minus.map(f64::from),
            StatColumn::RoundRating => self.round_rating,
            StatColumn::Hole(h) => self.hole_score(h).map(f64::from),
            StatColumn::Score => None,
        }
    }
}

impl Filterable for HolePar {
    fn course_name(&self) -> &str {
        &self.course_name
    }

    fn layout_name(&self) -> &str {
        &self.layout_name
    }

    fn player_name(&self) -> Option<&str> {
        None
    }

    fn start_date(&self) -> Option<NaiveDateTime> {
        None
    }

    fn stat_value(&self, stat: StatColumn) -> Option<f64> {
        match stat {
            StatColumn::Score => Some(f64::from(self.par)),
            StatColumn::Hole(h) if h == self.hole => Some(f64::from(self.par)),
            _ => None,
        }
    }
}

impl Filterable for RoundPar {
    fn course_name(&self) -> &str {
        &self.course_name
    }

    fn layout_name(&self) -> &str {
        &self.layout_name
    }

    fn player_name(&self) -> Option<&str> {
        None
    }

    fn start_date(&self) -> Option<NaiveDateTime> {
        None
    }

    fn stat_value(&self, stat: StatColumn) -> Option<f64> {
        match stat {
            StatColumn::Total => Some(f64::from(self.total)),
            StatColumn::Hole(h) => self.hole_par(h).map(f64::from),
            _ => None,
        }
    }
}

// ── FilterCriteria ────────────────────────────────────────────────────────────

/// Optional constraints; `None` (or an empty player set) means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub course: Option<String>,
    pub layout: Option<String>,
    pub players: Option<BTreeSet<String>>,
    /// Inclusive lower bound on the calendar date of `StartDate`.
    pub after: Option<NaiveDate>,
    /// Inclusive upper bound on the calendar date of `StartDate`.
    pub before: Option<NaiveDate>,
    /// Rows where this column is 0 (or absent) are dropped.
    pub non_zero_stat: Option<StatColumn>,
}

impl FilterCriteria {
    /// Criteria restricted to the course and layout only.
    ///
    /// Par tables are filtered with this so the player and date constraints
    /// of the main table are not echoed for them.
    pub fn course_layout(&self) -> FilterCriteria {
        FilterCriteria {
            course: self.course.clone(),
            layout: self.layout.clone(),
            ..FilterCriteria::default()
        }
    }

    /// Same criteria with a required non-zero stat.
    pub fn with_non_zero_stat(mut self, stat: StatColumn) -> Self {
        self.non_zero_stat = Some(stat);
        self
    }

    /// Whether no predicate is active.
    pub fn is_unconstrained(&self) -> bool {
        self.course.is_none()
            && self.layout.is_none()
            && self.active_players().is_none()
            && self.after.is_none()
            && self.before.is_none()
            && self.non_zero_stat.is_none()
    }

    /// Reject a date range whose lower bound lies after its upper bound.
    pub fn validate(&self) -> Result<()> {
        if let (Some(after), Some(before)) = (self.after, self.before) {
            if after > before {
                return Err(ScorecardError::InvalidConfiguration(format!(
                    "--after {} is later than --before {}",
                    after, before
                )));
            }
        }
        Ok(())
    }

    /// Per-layout analyses need both a course and a layout.
    pub fn require_course_and_layout(&self) -> Result<(&str, &str)> {
        match (self.course.as_deref(), self.layout.as_deref()) {
            (Some(course), Some(layout)) => Ok((course, layout)),
            (None, _) => Err(ScorecardError::InvalidConfiguration(
                "a course name is required".to_string(),
            )),
            (_, None) => Err(ScorecardError::InvalidConfiguration(
                "a layout name is required".to_string(),
            )),
        }
    }

    fn active_players(&self) -> Option<&BTreeSet<String>> {
        self.players.as_ref().filter(|p| !p.is_empty())
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(course) = &self.course {
            parts.push(format!("course '{}'", course));
        }
        if let Some(layout) = &self.layout {
            parts.push(format!("layout '{}'", layout));
        }
        if let Some(players) = self.active_players() {
            let names: Vec<&str> = players.iter().map(String::as_str).collect();
            parts.push(format!("players [{}]", names.join(", ")));
        }
        if let Some(after) = self.after {
            parts.push(format!("after {}", after));
        }
        if let Some(before) = self.before {
            parts.push(format!("before {}", before));
        }
        if let Some(stat) = self.non_zero_stat {
            parts.push(format!("non-zero {}", stat));
        }

        if parts.is_empty() {
            f.write_str("all data")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Keep the rows of `rows` that satisfy every active predicate of `criteria`.
pub fn apply_filters<T: Filterable>(rows: Vec<T>, criteria: &FilterCriteria) -> Vec<T> {
    let mut rows = rows;

    if let Some(course) = &criteria.course {
        rows.retain(|r| r.course_name() == course);
        debug!("course '{}': {} rows left", course, rows.len());
    }

    if let Some(layout) = &criteria.layout {
        rows.retain(|r| r.layout_name() == layout);
        debug!("layout '{}': {} rows left", layout, rows.len());
    }

    if let Some(players) = criteria.active_players() {
        rows.retain(|r| r.player_name().map_or(true, |p| players.contains(p)));
        debug!("{} player(s): {} rows left", players.len(), rows.len());
    }

    if let Some(after) = criteria.after {
        rows.retain(|r| r.start_date().map_or(true, |d| d.date() >= after));
        debug!("after {}: {} rows left", after, rows.len());
    }

    if let Some(before) = criteria.before {
        rows.retain(|r| r.start_date().map_or(true, |d| d.date() <= before));
        debug!("before {}: {} rows left", before, rows.len());
    }

    if let Some(stat) = criteria.non_zero_stat {
        rows.retain(|r| r.stat_value(stat).is_some_and(|v| v != 0.0));
        debug!("non-zero {}: {} rows left", stat, rows.len());
    }

    rows
}

/// Turn an empty filter result into [`ScorecardError::EmptyResultSet`].
pub fn require_rows<T>(rows: Vec<T>, criteria: &FilterCriteria) -> Result<Vec<T>> {
    if rows.is_empty() {
        Err(ScorecardError::EmptyResultSet(criteria.to_string()))
    } else {
        Ok(rows)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn round(player: &str, course: &str, start: NaiveDateTime, total: u32) -> RoundRecord {
        RoundRecord {
            player_name: player.to_string(),
            course_name: course.to_string(),
            layout_name: "Main".to_string(),
            start_date: start,
            end_date: start,
            total,
            plus_minus: Some(0),
            round_rating: None,
            holes: vec![3, if total == 0 { 0 } else { 3 }, 3],
        }
    }

    fn sample() -> Vec<RoundRecord> {
        vec![
            round("Alice", "Vipan", at(2024, 4, 1, 9), 9),
            round("Bob", "Vipan", at(2024, 4, 15, 18), 0),
            round("Alice", "Kvarnby", at(2024, 5, 1, 12), 10),
            round("Carol", "Vipan", at(2024, 5, 20, 23), 11),
        ]
    }

    fn players(names: &[&str]) -> Option<BTreeSet<String>> {
        Some(names.iter().map(|s| s.to_string()).collect())
    }

    fn names(rows: &[RoundRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.player_name.as_str()).collect()
    }

    // ── StatColumn ────────────────────────────────────────────────────────────

    #[test]
    fn test_stat_column_parse() {
        assert_eq!("Total".parse::<StatColumn>().unwrap(), StatColumn::Total);
        assert_eq!("hole18".parse::<StatColumn>().unwrap(), StatColumn::Hole(18));
        assert_eq!("+/-".parse::<StatColumn>().unwrap(), StatColumn::PlusMinus);
        assert!("Hole0".parse::<StatColumn>().is_err());
        assert!("Putts".parse::<StatColumn>().is_err());
    }

    #[test]
    fn test_stat_column_display_round_trips() {
        for stat in [StatColumn::Total, StatColumn::Hole(7), StatColumn::RoundRating] {
            assert_eq!(stat.to_string().parse::<StatColumn>().unwrap(), stat);
        }
    }

    #[test]
    fn test_stat_column_require_round_stat() {
        assert_eq!(StatColumn::Total.require_round_stat().unwrap(), StatColumn::Total);
        assert_eq!(
            StatColumn::Hole(4).require_round_stat().unwrap(),
            StatColumn::Hole(4)
        );
        assert!(StatColumn::RoundRating.require_round_stat().is_ok());
        assert!(matches!(
            StatColumn::Score.require_round_stat(),
            Err(ScorecardError::InvalidConfiguration(_))
        ));
    }

    // ── apply_filters ─────────────────────────────────────────────────────────

    #[test]
    fn test_no_criteria_keeps_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert_eq!(apply_filters(sample(), &criteria).len(), 4);
    }

    #[test]
    fn test_course_filter() {
        let criteria = FilterCriteria {
            course: Some("Vipan".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(sample(), &criteria)), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_player_set_filter() {
        let criteria = FilterCriteria {
            players: players(&["Alice", "Carol"]),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(sample(), &criteria)), vec!["Alice", "Alice", "Carol"]);
    }

    #[test]
    fn test_empty_player_set_is_unconstrained() {
        let criteria = FilterCriteria {
            players: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert!(criteria.is_unconstrained());
        assert_eq!(apply_filters(sample(), &criteria).len(), 4);
    }

    #[test]
    fn test_date_bounds_are_inclusive_by_day() {
        let criteria = FilterCriteria {
            after: NaiveDate::from_ymd_opt(2024, 4, 15),
            before: NaiveDate::from_ymd_opt(2024, 5, 20),
            ..Default::default()
        };
        // Bob starts late on the 15th and Carol late on the 20th; both count.
        assert_eq!(names(&apply_filters(sample(), &criteria)), vec!["Bob", "Alice", "Carol"]);
    }

    #[test]
    fn test_non_zero_stat_drops_unfinished_rounds() {
        let criteria = FilterCriteria::default().with_non_zero_stat(StatColumn::Total);
        assert_eq!(names(&apply_filters(sample(), &criteria)), vec!["Alice", "Alice", "Carol"]);
    }

    #[test]
    fn test_non_zero_stat_drops_rows_without_the_column() {
        let criteria = FilterCriteria::default().with_non_zero_stat(StatColumn::Score);
        assert!(apply_filters(sample(), &criteria).is_empty());
    }

    #[test]
    fn test_filter_composition_is_order_independent() {
        let course_players = FilterCriteria {
            course: Some("Vipan".to_string()),
            players: players(&["Alice", "Bob"]),
            ..Default::default()
        };
        let dates = FilterCriteria {
            after: NaiveDate::from_ymd_opt(2024, 4, 2),
            before: NaiveDate::from_ymd_opt(2024, 12, 31),
            ..Default::default()
        };

        let forward = apply_filters(apply_filters(sample(), &course_players), &dates);
        let reverse = apply_filters(apply_filters(sample(), &dates), &course_players);
        assert_eq!(forward, reverse);
        assert_eq!(names(&forward), vec!["Bob"]);
    }

    #[test]
    fn test_par_rows_ignore_player_and_date_predicates() {
        let pars = vec![
            RoundPar {
                course_name: "Vipan".to_string(),
                layout_name: "Main".to_string(),
                total: 9,
                holes: vec![3, 3, 3],
            },
            RoundPar {
                course_name: "Kvarnby".to_string(),
                layout_name: "Main".to_string(),
                total: 10,
                holes: vec![3, 4, 3],
            },
        ];
        let criteria = FilterCriteria {
            course: Some("Vipan".to_string()),
            players: players(&["Alice"]),
            after: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        let kept = apply_filters(pars, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].course_name, "Vipan");
    }

    // ── require_rows ──────────────────────────────────────────────────────────

    #[test]
    fn test_require_rows_echoes_criteria() {
        let criteria = FilterCriteria {
            course: Some("Nowhere".to_string()),
            after: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let rows = apply_filters(sample(), &criteria);
        let err = require_rows(rows, &criteria).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "No data found for course 'Nowhere', after 2024-01-01");
    }

    #[test]
    fn test_require_rows_passes_non_empty() {
        let rows = require_rows(sample(), &FilterCriteria::default()).unwrap();
        assert_eq!(rows.len(), 4);
    }

    // ── validation ────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_inverted_range() {
        let criteria = FilterCriteria {
            after: NaiveDate::from_ymd_opt(2024, 6, 1),
            before: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert!(matches!(
            criteria.validate(),
            Err(ScorecardError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_require_course_and_layout() {
        let mut criteria = FilterCriteria {
            course: Some("Vipan".to_string()),
            ..Default::default()
        };
        assert!(criteria.require_course_and_layout().is_err());
        criteria.layout = Some("Main".to_string());
        assert_eq!(criteria.require_course_and_layout().unwrap(), ("Vipan", "Main"));
    }

    #[test]
    fn test_display_all_data() {
        assert_eq!(FilterCriteria::default().to_string(), "all data");
    }

    #[test]
    fn test_course_layout_drops_other_predicates() {
        let criteria = FilterCriteria {
            course: Some("Vipan".to_string()),
            layout: Some("Main".to_string()),
            players: players(&["Alice"]),
            after: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let narrowed = criteria.course_layout();
        assert_eq!(narrowed.course.as_deref(), Some("Vipan"));
        assert!(narrowed.players.is_none());
        assert!(narrowed.after.is_none());
    }
}
