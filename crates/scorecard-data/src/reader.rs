//! CSV discovery and loading for scorecard exports.
//!
//! Each file is one round: a header row, one row per player and a `Par` row.
//! Files are read in sorted path order so concatenated output is stable.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use regex::Regex;
use scorecard_core::error::{Result, ScorecardError};
use scorecard_core::models::{RawRound, Scorecard};
use scorecard_core::text::normalize_quotes;
use scorecard_core::time_utils::parse_scorecard_timestamp;
use serde::Serialize;
use tracing::{debug, warn};

const PLAYER_NAME: &str = "PlayerName";
const COURSE_NAME: &str = "CourseName";
const LAYOUT_NAME: &str = "LayoutName";
const START_DATE: &str = "StartDate";
const END_DATE: &str = "EndDate";
const TOTAL: &str = "Total";
const PLUS_MINUS: &str = "PlusMinus";
const PLUS_MINUS_EXPORT: &str = "+/-";
const ROUND_RATING: &str = "RoundRating";

// ── Public types ──────────────────────────────────────────────────────────────

/// A file that was skipped, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Which files made it into a directory load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<PathBuf>,
    pub failures: Vec<LoadFailure>,
}

/// Every scorecard that loaded from a directory, in file order.
#[derive(Debug, Clone)]
pub struct LoadedScorecards {
    pub scorecards: Vec<Scorecard>,
    pub report: LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the `.csv` files (any extension case) directly inside `dir`, sorted
/// by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Scorecard directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every scorecard in `dir`.
///
/// A file that fails to parse is skipped with a warning and listed in
/// [`LoadReport::failures`]. The load itself only fails when the directory
/// is missing, holds no CSV files, or none of its files could be loaded.
pub fn load_scorecards(dir: &Path) -> Result<LoadedScorecards> {
    if !dir.is_dir() {
        return Err(ScorecardError::DataPathNotFound(dir.to_path_buf()));
    }

    let files = find_csv_files(dir);
    if files.is_empty() {
        return Err(ScorecardError::NoDataFiles(dir.to_path_buf()));
    }

    let mut scorecards = Vec::with_capacity(files.len());
    let mut report = LoadReport::default();

    for path in &files {
        match load_scorecard(path) {
            Ok(card) => {
                report.loaded.push(path.clone());
                scorecards.push(card);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.failures.push(LoadFailure {
                    path: path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if scorecards.is_empty() {
        return Err(ScorecardError::NoValidFiles {
            path: dir.to_path_buf(),
            failed: report.failures.len(),
        });
    }

    debug!(
        "Loaded {} of {} scorecard files from {}",
        scorecards.len(),
        files.len(),
        dir.display()
    );

    Ok(LoadedScorecards { scorecards, report })
}

/// Load a single scorecard file.
pub fn load_scorecard(path: &Path) -> Result<Scorecard> {
    let file = std::fs::File::open(path).map_err(|source| ScorecardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_scorecard(path, file)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Column positions resolved from the header row.
struct Columns {
    player_name: usize,
    course_name: usize,
    layout_name: usize,
    start_date: usize,
    end_date: usize,
    total: usize,
    plus_minus: usize,
    round_rating: usize,
    /// Position of `Hole1`, `Hole2`, ... in hole order.
    holes: Vec<usize>,
}

impl Columns {
    fn resolve(path: &Path, headers: &csv::StringRecord) -> Result<Self> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let required = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| ScorecardError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        let plus_minus = index
            .get(PLUS_MINUS)
            .or_else(|| index.get(PLUS_MINUS_EXPORT))
            .copied()
            .ok_or_else(|| ScorecardError::MissingColumn {
                path: path.to_path_buf(),
                column: PLUS_MINUS.to_string(),
            })?;

        Ok(Columns {
            player_name: required(PLAYER_NAME)?,
            course_name: required(COURSE_NAME)?,
            layout_name: required(LAYOUT_NAME)?,
            start_date: required(START_DATE)?,
            end_date: required(END_DATE)?,
            total: required(TOTAL)?,
            plus_minus,
            round_rating: required(ROUND_RATING)?,
            holes: resolve_hole_columns(path, headers)?,
        })
    }
}

/// Locate the `HoleN` columns and check they run 1..=N without gaps.
fn resolve_hole_columns(path: &Path, headers: &csv::StringRecord) -> Result<Vec<usize>> {
    let re = Regex::new(r"^Hole(\d+)$").expect("regex is valid");

    let mut numbered: Vec<(u32, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let caps = re.captures(name.trim())?;
            let number = caps[1].parse::<u32>().ok()?;
            Some((number, i))
        })
        .collect();
    numbered.sort_by_key(|(number, _)| *number);

    if numbered.is_empty() {
        return Err(ScorecardError::MissingColumn {
            path: path.to_path_buf(),
            column: "Hole1".to_string(),
        });
    }

    for (expected, (number, _)) in (1u32..).zip(numbered.iter()) {
        if *number != expected {
            return Err(ScorecardError::MissingColumn {
                path: path.to_path_buf(),
                column: format!("Hole{}", expected),
            });
        }
    }

    Ok(numbered.into_iter().map(|(_, i)| i).collect())
}

/// Parse CSV text from `reader`; `path` is only used for error context.
fn read_scorecard<R: Read>(path: &Path, reader: R) -> Result<Scorecard> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let csv_err = |source: csv::Error| ScorecardError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = csv_reader.headers().map_err(csv_err)?.clone();
    let columns = Columns::resolve(path, &headers)?;

    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let row = RowParser {
            path,
            row: i + 1,
            headers: &headers,
            record: &record,
        };
        rows.push(row.parse(&columns)?);
    }

    let par_rows = rows.iter().filter(|r: &&RawRound| r.is_par()).count();
    debug!(
        "File {}: {} holes, {} player rows, {} par rows",
        path.display(),
        columns.holes.len(),
        rows.len() - par_rows,
        par_rows,
    );

    Ok(Scorecard {
        source: path.to_path_buf(),
        hole_count: columns.holes.len(),
        rows,
    })
}

/// Typed access to the fields of one data row with error context attached.
struct RowParser<'a> {
    path: &'a Path,
    row: usize,
    headers: &'a csv::StringRecord,
    record: &'a csv::StringRecord,
}

impl RowParser<'_> {
    fn parse(&self, columns: &Columns) -> Result<RawRound> {
        let holes = columns
            .holes
            .iter()
            .map(|&i| self.hole_score(i))
            .collect::<Result<Vec<u32>>>()?;

        Ok(RawRound {
            player_name: self.text(columns.player_name),
            course_name: self.text(columns.course_name),
            layout_name: self.text(columns.layout_name),
            start_date: self.timestamp(columns.start_date)?,
            end_date: self.timestamp(columns.end_date)?,
            total: self.total(columns.total)?,
            plus_minus: self.optional_number(columns.plus_minus)?,
            round_rating: self.optional_number(columns.round_rating)?,
            holes,
        })
    }

    fn raw(&self, i: usize) -> &str {
        self.record.get(i).unwrap_or("")
    }

    fn malformed(&self, i: usize, message: String) -> ScorecardError {
        ScorecardError::MalformedInput {
            path: self.path.to_path_buf(),
            row: self.row,
            column: self.headers.get(i).unwrap_or("?").to_string(),
            message,
        }
    }

    fn text(&self, i: usize) -> String {
        normalize_quotes(self.raw(i))
    }

    fn timestamp(&self, i: usize) -> Result<NaiveDateTime> {
        let raw = self.raw(i);
        parse_scorecard_timestamp(raw).ok_or_else(|| {
            self.malformed(i, format!("expected YYYY-MM-DD HHMM, got {:?}", raw))
        })
    }

    fn required_number<T: std::str::FromStr>(&self, i: usize) -> Result<T> {
        let raw = self.raw(i);
        raw.parse::<T>()
            .map_err(|_| self.malformed(i, format!("expected a number, got {:?}", raw)))
    }

    fn optional_number<T: std::str::FromStr>(&self, i: usize) -> Result<Option<T>> {
        if self.raw(i).is_empty() {
            return Ok(None);
        }
        self.required_number(i).map(Some)
    }

    /// An empty total is left by exports of abandoned rounds; it reads as an
    /// unfinished round.
    fn total(&self, i: usize) -> Result<u32> {
        Ok(self.optional_number(i)?.unwrap_or(0))
    }

    /// An empty hole cell is an unplayed hole, same as an explicit 0.
    fn hole_score(&self, i: usize) -> Result<u32> {
        let raw = self.raw(i);
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse::<u32>().map_err(|_| {
            self.malformed(i, format!("expected a non-negative integer, got {:?}", raw))
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
