//! Domain layer for disc golf scorecard statistics.
//!
//! Holds the record types every other crate passes around, the score-type
//! classifier, the composable filter chain, small statistics helpers and the
//! command-line settings.

pub mod classifier;
pub mod error;
pub mod filter;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod text;
pub mod time_utils;
