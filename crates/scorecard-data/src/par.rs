//! Separate the `Par` rows from player rows and index them for lookup.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use scorecard_core::classifier::ParLookup;
use scorecard_core::error::{Result, ScorecardError};
use scorecard_core::models::{HolePar, HoleRecord, RoundPar, RoundRecord, PAR_PLAYER};
use tracing::{debug, warn};

// ── ParSource ─────────────────────────────────────────────────────────────────

/// A reshaped row that may be a par reference instead of a player's score.
pub trait ParSource: Sized {
    /// The par-table row this record turns into.
    type Par: Clone + Eq + Hash;

    fn is_par_row(&self) -> bool;

    /// Drop the player and date fields, keeping the layout and par values.
    fn into_par(self) -> Self::Par;
}

impl ParSource for HoleRecord {
    type Par = HolePar;

    fn is_par_row(&self) -> bool {
        self.player_name == PAR_PLAYER
    }

    fn into_par(self) -> HolePar {
        HolePar {
            course_name: self.course_name,
            layout_name: self.layout_name,
            hole: self.hole,
            par: self.score,
        }
    }
}

impl ParSource for RoundRecord {
    type Par = RoundPar;

    fn is_par_row(&self) -> bool {
        self.player_name == PAR_PLAYER
    }

    fn into_par(self) -> RoundPar {
        RoundPar {
            course_name: self.course_name,
            layout_name: self.layout_name,
            total: self.total,
            holes: self.holes,
        }
    }
}

// ── Splitting ─────────────────────────────────────────────────────────────────

/// Split `records` into player rows and a deduplicated par table.
///
/// Player rows keep their order. Par rows that are identical across files
/// collapse to their first occurrence; par rows that differ in any value are
/// all kept.
pub fn split_par<R: ParSource>(records: Vec<R>) -> (Vec<R>, Vec<R::Par>) {
    let (pars, players): (Vec<R>, Vec<R>) = records.into_iter().partition(|r| r.is_par_row());
    let pars = dedup_pars(pars.into_iter().map(ParSource::into_par).collect());
    debug!("Split {} player rows and {} par rows", players.len(), pars.len());
    (players, pars)
}

/// Remove exact duplicates, keeping the first occurrence of each row.
pub fn dedup_pars<P: Clone + Eq + Hash>(pars: Vec<P>) -> Vec<P> {
    let mut seen: HashSet<P> = HashSet::with_capacity(pars.len());
    pars.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

// ── Lookup ────────────────────────────────────────────────────────────────────

type LayoutKey = (String, String);

/// Hole pars keyed by course, layout and hole.
///
/// When two par rows disagree on the same hole the first one wins.
#[derive(Debug, Clone, Default)]
pub struct HoleParIndex {
    pars: HashMap<(String, String, u32), u32>,
}

impl HoleParIndex {
    pub fn new(pars: &[HolePar]) -> Self {
        let mut index = HashMap::with_capacity(pars.len());
        for p in pars {
            let key = (p.course_name.clone(), p.layout_name.clone(), p.hole);
            match index.get(&key) {
                Some(&existing) if existing != p.par => {
                    warn!(
                        "Conflicting par for {} / {} hole {}: keeping {}, ignoring {}",
                        p.course_name, p.layout_name, p.hole, existing, p.par
                    );
                }
                Some(_) => {}
                None => {
                    index.insert(key, p.par);
                }
            }
        }
        Self { pars: index }
    }

    pub fn len(&self) -> usize {
        self.pars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pars.is_empty()
    }
}

impl ParLookup for HoleParIndex {
    fn hole_par(&self, course: &str, layout: &str, hole: u32) -> Result<u32> {
        self.pars
            .get(&(course.to_string(), layout.to_string(), hole))
            .copied()
            .ok_or_else(|| ScorecardError::MissingParReference {
                course: course.to_string(),
                layout: layout.to_string(),
                hole: Some(hole),
            })
    }
}

/// Round pars keyed by course and layout.
#[derive(Debug, Clone, Default)]
pub struct RoundParIndex {
    pars: HashMap<LayoutKey, RoundPar>,
}

impl RoundParIndex {
    pub fn new(pars: &[RoundPar]) -> Self {
        let mut index: HashMap<LayoutKey, RoundPar> = HashMap::with_capacity(pars.len());
        for p in pars {
            let key = (p.course_name.clone(), p.layout_name.clone());
            if let Some(existing) = index.get(&key) {
                if existing != p {
                    warn!(
                        "Conflicting par rows for {} / {}: keeping {}p, ignoring {}p",
                        p.course_name, p.layout_name, existing.total, p.total
                    );
                }
                continue;
            }
            index.insert(key, p.clone());
        }
        Self { pars: index }
    }

    /// Par row of the layout, if any file carried one.
    pub fn find(&self, course: &str, layout: &str) -> Option<&RoundPar> {
        self.pars.get(&(course.to_string(), layout.to_string()))
    }

    /// Like [`RoundParIndex::find`] but a missing layout is an error.
    pub fn require(&self, course: &str, layout: &str) -> Result<&RoundPar> {
        self.find(course, layout)
            .ok_or_else(|| ScorecardError::MissingParReference {
                course: course.to_string(),
                layout: layout.to_string(),
                hole: None,
            })
    }

    pub fn len(&self) -> usize {
        self.pars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pars.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
