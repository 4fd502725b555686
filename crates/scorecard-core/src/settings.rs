use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::filter::{FilterCriteria, StatColumn};
use crate::models::XAxisMode;
use crate::text::normalize_quotes;
use crate::time_utils::parse_date_arg;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Statistics from disc golf scorecard CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "disc-stats",
    about = "Statistics from disc golf scorecard CSV exports",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Logging level
    #[arg(
        long,
        global = true,
        default_value = "WARNING",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// One analysis per subcommand.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count holes per score type (birdie, par, bogey, ...)
    ScoreDistribution {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Follow a stat round by round for each player
    PerformanceCurve {
        #[command(flatten)]
        common: CommonArgs,

        /// What stat to follow, e.g. Total, Hole1, Hole18
        #[arg(short, long, default_value = "Total")]
        stat: StatColumn,

        /// Hide the par reference
        #[arg(long)]
        hide_par: bool,

        /// Index rounds by round number or by start date
        #[arg(long, value_enum, default_value_t = XAxisMode::Round)]
        x_axis_mode: XAxisMode,

        /// Hide the per-player average
        #[arg(long)]
        hide_avg: bool,
    },

    /// Score spread per hole of one layout
    HoleDistribution {
        #[command(flatten)]
        common: CommonArgs,

        /// Hide the par reference
        #[arg(long)]
        hide_par: bool,
    },

    /// Round counts, best/worst/average totals and trend per player
    BasicStats {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Command {
    /// Arguments shared by every subcommand.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::ScoreDistribution { common }
            | Command::PerformanceCurve { common, .. }
            | Command::HoleDistribution { common, .. }
            | Command::BasicStats { common } => common,
        }
    }
}

/// Input directory, filters and output destination.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory containing the scorecard CSV files
    #[arg(short = 'd', long)]
    pub csv_dir: PathBuf,

    /// Course name to filter by
    #[arg(short, long)]
    pub course: Option<String>,

    /// Layout name to filter by
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Player name(s) to filter by (e.g. -p Alice -p Bob)
    #[arg(short = 'p', long = "player")]
    pub players: Vec<String>,

    /// Only include rounds started on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub after: Option<NaiveDate>,

    /// Only include rounds started on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub before: Option<NaiveDate>,

    /// Write the result as JSON to this path instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommonArgs {
    /// Filter criteria described by these arguments.
    ///
    /// Names get the same quote normalisation as the loaded CSV text.
    pub fn criteria(&self) -> FilterCriteria {
        let players: BTreeSet<String> = self.players.iter().map(|p| normalize_quotes(p)).collect();
        FilterCriteria {
            course: self.course.as_deref().map(normalize_quotes),
            layout: self.layout.as_deref().map(normalize_quotes),
            players: if players.is_empty() {
                None
            } else {
                Some(players)
            },
            after: self.after,
            before: self.before,
            non_zero_stat: None,
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_stats_defaults() {
        let settings = Settings::load_from(["disc-stats", "basic-stats", "-d", "cards"]);

        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.debug);
        let common = settings.command.common();
        assert_eq!(common.csv_dir, PathBuf::from("cards"));
        assert!(common.course.is_none());
        assert!(common.players.is_empty());
        assert!(common.output.is_none());
        assert!(common.criteria().is_unconstrained());
    }

    #[test]
    fn test_repeated_player_flags() {
        let settings = Settings::load_from([
            "disc-stats",
            "score-distribution",
            "-d",
            "cards",
            "-p",
            "Alice",
            "-p",
            "Bob",
        ]);
        let criteria = settings.command.common().criteria();
        let players = criteria.players.unwrap();
        assert_eq!(players.len(), 2);
        assert!(players.contains("Alice"));
        assert!(players.contains("Bob"));
    }

    #[test]
    fn test_names_are_quote_normalized() {
        let settings = Settings::load_from([
            "disc-stats",
            "score-distribution",
            "-d",
            "cards",
            "-c",
            "\u{201C}Vipan\u{201D}",
            "-p",
            "Anna \u{201C}Ace\u{201D} Berg",
        ]);
        let criteria = settings.command.common().criteria();
        assert_eq!(criteria.course.as_deref(), Some("\"Vipan\""));
        assert!(criteria.players.unwrap().contains("Anna \"Ace\" Berg"));
    }

    #[test]
    fn test_date_flags_are_parsed() {
        let settings = Settings::load_from([
            "disc-stats",
            "basic-stats",
            "-d",
            "cards",
            "--after",
            "2024-04-01",
            "--before",
            "2024-09-30",
        ]);
        let criteria = settings.command.common().criteria();
        assert_eq!(criteria.after, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(criteria.before, NaiveDate::from_ymd_opt(2024, 9, 30));
    }

    #[test]
    fn test_invalid_date_flag_is_rejected() {
        let result = Settings::try_parse_from([
            "disc-stats",
            "basic-stats",
            "-d",
            "cards",
            "--after",
            "2024-13-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_performance_curve_options() {
        let settings = Settings::load_from([
            "disc-stats",
            "performance-curve",
            "-d",
            "cards",
            "-c",
            "Vipan",
            "-l",
            "Main",
            "--stat",
            "Hole3",
            "--x-axis-mode",
            "date",
            "--hide-par",
        ]);
        match settings.command {
            Command::PerformanceCurve {
                common,
                stat,
                hide_par,
                x_axis_mode,
                hide_avg,
            } => {
                assert_eq!(common.course.as_deref(), Some("Vipan"));
                assert_eq!(stat, StatColumn::Hole(3));
                assert!(hide_par);
                assert!(!hide_avg);
                assert_eq!(x_axis_mode, XAxisMode::Date);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_performance_curve_default_stat() {
        let settings = Settings::load_from(["disc-stats", "performance-curve", "-d", "cards"]);
        match settings.command {
            Command::PerformanceCurve {
                stat, x_axis_mode, ..
            } => {
                assert_eq!(stat, StatColumn::Total);
                assert_eq!(x_axis_mode, XAxisMode::Round);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_stat_is_rejected() {
        let result = Settings::try_parse_from([
            "disc-stats",
            "performance-curve",
            "-d",
            "cards",
            "--stat",
            "Putts",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::load_from(["disc-stats", "basic-stats", "-d", "cards", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_csv_dir_is_required() {
        assert!(Settings::try_parse_from(["disc-stats", "basic-stats"]).is_err());
    }
}
