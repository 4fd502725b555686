//! Loading and analysis of disc golf scorecard exports.
//!
//! [`reader`] turns a directory of CSV files into [`Scorecard`]s,
//! [`reshaper`] builds the hole and round views, [`par`] splits off the par
//! rows, and [`aggregator`] / [`analysis`] compute the reported statistics.
//!
//! [`Scorecard`]: scorecard_core::models::Scorecard

pub mod aggregator;
pub mod analysis;
pub mod par;
pub mod reader;
pub mod reshaper;
