mod bootstrap;
mod report;

use anyhow::Result;
use scorecard_core::error::ScorecardError;
use scorecard_core::filter::{apply_filters, require_rows, FilterCriteria};
use scorecard_core::settings::{Command, Settings};
use scorecard_data::aggregator::summarize;
use scorecard_data::analysis::{
    hole_distribution, performance_series, score_distribution, ScorecardSet,
};
use scorecard_data::par::{HoleParIndex, RoundParIndex};

fn main() -> Result<()> {
    let settings = Settings::load();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("disc-stats v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&settings.command) {
        if let Some(err) = e.downcast_ref::<ScorecardError>() {
            if err.is_recoverable() {
                println!("{}", err);
                return Ok(());
            }
        }
        return Err(e);
    }

    Ok(())
}

/// Load, filter and report for one subcommand.
fn run(command: &Command) -> Result<()> {
    let common = command.common();
    let criteria = common.criteria();
    criteria.validate()?;
    tracing::info!("Filtering by {}", criteria);

    let output = common.output.as_deref();

    match command {
        Command::ScoreDistribution { .. } => {
            let set = ScorecardSet::load(&common.csv_dir)?;
            let holes = require_rows(apply_filters(set.holes, &criteria), &criteria)?;
            let pars = HoleParIndex::new(&set.hole_pars);

            let dist = score_distribution(&holes, &pars)?;
            report::emit(output, &dist, report::render_score_distribution)?;
        }

        Command::PerformanceCurve {
            stat,
            hide_par,
            x_axis_mode,
            hide_avg,
            ..
        } => {
            let stat = stat.require_round_stat()?;
            let (course, layout) = criteria.require_course_and_layout()?;
            let (course, layout) = (course.to_string(), layout.to_string());
            let criteria = criteria.with_non_zero_stat(stat);

            let set = ScorecardSet::load(&common.csv_dir)?;
            let rounds = require_rows(apply_filters(set.rounds, &criteria), &criteria)?;
            let pars = apply_filters(set.round_pars, &par_criteria(&criteria));
            let pars = RoundParIndex::new(&pars);

            let mut series = performance_series(
                &rounds,
                &pars,
                (course.as_str(), layout.as_str()),
                stat,
                *x_axis_mode,
            );
            if *hide_par {
                series.par = None;
            }
            if *hide_avg {
                series.players.iter_mut().for_each(|p| p.average = None);
            }
            report::emit(output, &series, report::render_performance)?;
        }

        Command::HoleDistribution { hide_par, .. } => {
            criteria.require_course_and_layout()?;

            let set = ScorecardSet::load(&common.csv_dir)?;
            let holes = require_rows(apply_filters(set.holes, &criteria), &criteria)?;
            let pars = if *hide_par {
                Vec::new()
            } else {
                apply_filters(set.hole_pars, &par_criteria(&criteria))
            };

            let stats = hole_distribution(&holes, &pars);
            report::emit(output, &stats, |s| report::render_hole_distribution(s))?;
        }

        Command::BasicStats { .. } => {
            let set = ScorecardSet::load(&common.csv_dir)?;
            let rounds = require_rows(apply_filters(set.rounds, &criteria), &criteria)?;
            let holes = apply_filters(set.holes, &criteria);

            let stats = summarize(&holes, &rounds);
            report::emit(output, &stats, report::render_summary)?;
        }
    }

    Ok(())
}

/// Par tables only follow the layout (and stat) constraints; players and
/// dates do not apply to them.
fn par_criteria(criteria: &FilterCriteria) -> FilterCriteria {
    let pars = criteria.course_layout();
    match criteria.non_zero_stat {
        Some(stat) => pars.with_non_zero_stat(stat),
        None => pars,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str =
        "PlayerName,CourseName,LayoutName,StartDate,EndDate,Total,+/-,RoundRating,Hole1,Hole2,Hole3";

    fn write_round(dir: &Path, name: &str, day: u32, rows: &[&str]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(
            file,
            "Par,Vipan,Main,2024-05-{:02} 1000,2024-05-{:02} 1130,9,,,3,3,3",
            day, day
        )
        .unwrap();
        for row in rows {
            writeln!(
                file,
                "{},Vipan,Main,2024-05-{:02} 1000,2024-05-{:02} 1130,{}",
                row.split(',').next().unwrap(),
                day,
                day,
                row.split_once(',').unwrap().1
            )
            .unwrap();
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_round(dir.path(), "a.csv", 1, &["Alice,10,1,,3,4,3", "Bob,8,,,3,0,5"]);
        write_round(dir.path(), "b.csv", 2, &["Alice,8,-1,,3,3,2"]);
        dir
    }

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["disc-stats"];
        argv.extend_from_slice(args);
        Settings::load_from(argv).command
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_par_criteria_drops_player_and_dates() {
        let criteria = FilterCriteria {
            course: Some("Vipan".to_string()),
            players: Some(["Alice".to_string()].into_iter().collect()),
            ..FilterCriteria::default()
        };
        let pars = par_criteria(&criteria);
        assert_eq!(pars.course.as_deref(), Some("Vipan"));
        assert!(pars.players.is_none());
        assert!(pars.non_zero_stat.is_none());
    }

    #[test]
    fn test_run_basic_stats_json() {
        let dir = fixture();
        let out = dir.path().join("stats.json");
        let cmd = command(&[
            "basic-stats",
            "-d",
            dir.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        run(&cmd).unwrap();

        let value = read_json(&out);
        assert_eq!(value["overall"]["rounds"], 3);
        assert_eq!(value["overall"]["finished_rounds"], 2);
        assert_eq!(value["overall"]["best_total"], 8);
        assert_eq!(value["players"][0]["player_name"], "Alice");
    }

    #[test]
    fn test_run_score_distribution_json() {
        let dir = fixture();
        let out = dir.path().join("dist.json");
        let cmd = command(&[
            "score-distribution",
            "-d",
            dir.path().to_str().unwrap(),
            "-p",
            "Alice",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(&cmd).unwrap();

        let value = read_json(&out);
        assert_eq!(value["total_holes"], 6);
    }

    #[test]
    fn test_run_performance_curve_skips_unfinished() {
        let dir = fixture();
        let out = dir.path().join("curve.json");
        let cmd = command(&[
            "performance-curve",
            "-d",
            dir.path().to_str().unwrap(),
            "-c",
            "Vipan",
            "-l",
            "Main",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(&cmd).unwrap();

        let value = read_json(&out);
        assert_eq!(value["par"], 9.0);
        let players = value["players"].as_array().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0]["player_name"], "Alice");
    }

    #[test]
    fn test_run_performance_curve_requires_layout() {
        let dir = fixture();
        let cmd = command(&[
            "performance-curve",
            "-d",
            dir.path().to_str().unwrap(),
            "-c",
            "Vipan",
        ]);
        let err = run(&cmd).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScorecardError>(),
            Some(ScorecardError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_run_performance_curve_rejects_score_stat() {
        let dir = fixture();
        let cmd = command(&[
            "performance-curve",
            "-d",
            dir.path().to_str().unwrap(),
            "-c",
            "Vipan",
            "-l",
            "Main",
            "--stat",
            "Score",
        ]);
        let err = run(&cmd).unwrap_err();
        let err = err.downcast_ref::<ScorecardError>().unwrap();
        assert!(matches!(err, ScorecardError::InvalidConfiguration(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_run_hole_distribution_hide_par() {
        let dir = fixture();
        let out = dir.path().join("holes.json");
        let cmd = command(&[
            "hole-distribution",
            "-d",
            dir.path().to_str().unwrap(),
            "-c",
            "Vipan",
            "-l",
            "Main",
            "--hide-par",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(&cmd).unwrap();

        let value = read_json(&out);
        let holes = value.as_array().unwrap();
        assert_eq!(holes.len(), 3);
        assert!(holes.iter().all(|h| h["par"].is_null()));
    }

    #[test]
    fn test_run_empty_result_is_recoverable() {
        let dir = fixture();
        let cmd = command(&["basic-stats", "-d", dir.path().to_str().unwrap(), "-p", "Nobody"]);
        let err = run(&cmd).unwrap_err();
        let err = err.downcast_ref::<ScorecardError>().unwrap();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_run_missing_directory() {
        let cmd = command(&["basic-stats", "-d", "/tmp/does-not-exist-scorecards-xyz"]);
        let err = run(&cmd).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScorecardError>(),
            Some(ScorecardError::DataPathNotFound(_))
        ));
    }
}
