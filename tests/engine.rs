use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tipster_terminal::dataset::{Dataset, MatchRecord};
use tipster_terminal::engine::{EngineConfig, StatisticalEngine};
use tipster_terminal::error::EngineError;
use tipster_terminal::football_data::parse_results_csv;
use tipster_terminal::goal_expectancy::expected_goals;
use tipster_terminal::leagues::{LEAGUES, LeagueContext};
use tipster_terminal::score_matrix::ScoreMatrix;
use tipster_terminal::strength::TeamStrength;

fn fixture_dataset() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("league_full.csv");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_results_csv(&raw).expect("fixture should parse")
}

fn engine_for(dataset: Dataset) -> StatisticalEngine {
    let context = LeagueContext::new(LEAGUES[0], "2526", dataset);
    StatisticalEngine::new(context, EngineConfig::default()).expect("engine should build")
}

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

#[test]
fn baseline_comes_from_every_match() {
    let engine = engine_for(fixture_dataset());
    let baseline = engine.baseline();
    assert_eq!(baseline.sample_matches, 10);
    assert!(close(baseline.home_goals, 1.5, 1e-12));
    assert!(close(baseline.away_goals, 1.1, 1e-12));
    assert!(close(baseline.home_corners, 5.3, 1e-12));
    assert!(close(baseline.away_corners, 4.2, 1e-12));
}

#[test]
fn strength_uses_venue_split() {
    let engine = engine_for(fixture_dataset());
    let arsenal = engine.calculate_strength("Arsenal").unwrap();
    assert_eq!(arsenal.home_matches, 5);
    assert_eq!(arsenal.away_matches, 2);
    assert!(close(arsenal.attack_home, 1.2, 1e-9));
    assert!(close(arsenal.defense_home, 0.8 / 1.1, 1e-9));
    assert!(close(arsenal.attack_away, 1.5 / 1.1, 1e-9));
    assert!(close(arsenal.defense_away, 1.0, 1e-9));

    // A single home match is enough.
    let everton = engine.calculate_strength("Everton").unwrap();
    assert_eq!(everton.home_matches, 1);
    assert!(close(everton.attack_home, 0.0, 1e-12));
}

#[test]
fn worked_example_expectancy() {
    let engine = engine_for(fixture_dataset());
    let home = engine.calculate_strength("Arsenal").unwrap();
    let away = TeamStrength {
        attack_away: 0.97 / (home.defense_home * engine.baseline().away_goals),
        defense_away: 0.90,
        ..engine.calculate_strength("Burnley").unwrap()
    };
    let xg = expected_goals(&home, &away, engine.baseline());
    assert_eq!(xg.rounded(), (1.62, 0.97));

    let matrix = ScoreMatrix::build(xg.home, xg.away, 6);
    let mass = matrix.total_mass();
    assert!((0.99..=1.0).contains(&mass), "mass {mass}");
}

#[test]
fn predicts_fixture_from_csv() {
    let engine = engine_for(fixture_dataset());
    let bundle = engine.predict_match("Arsenal", "Burnley").unwrap();
    assert!(close(bundle.lambda_home, 1.6, 1e-9));
    assert!(close(bundle.lambda_away, 0.97, 1e-9));
    assert!(bundle.outcomes.home > bundle.outcomes.draw);
    assert!(bundle.outcomes.draw > bundle.outcomes.away);
    assert!(bundle.secondary_fallback.is_none());

    let reverse = engine.predict_match("Chelsea", "Arsenal").unwrap();
    assert!(close(reverse.lambda_home, 1.5, 1e-9));
    assert!(close(reverse.lambda_away, 2.05, 1e-9));
    assert!(reverse.outcomes.away > reverse.outcomes.home);
}

#[test]
fn outcome_sum_is_bounded_by_truncated_mass() {
    let engine = engine_for(fixture_dataset());
    let teams = engine.list_teams();
    for home in &teams {
        for away in &teams {
            if home == away {
                continue;
            }
            let bundle = engine.predict_match(home, away).unwrap();
            let sum = bundle.outcomes.sum();
            let deficit = bundle.matrix.truncated_mass() * 100.0;
            assert!(sum <= 100.0 + 0.15, "{home} vs {away}: {sum}");
            assert!(sum >= 100.0 - deficit - 0.15, "{home} vs {away}: {sum} (deficit {deficit})");
        }
    }
}

#[test]
fn row_order_does_not_matter() {
    let forward = engine_for(fixture_dataset());
    let mut records = fixture_dataset().records().to_vec();
    records.reverse();
    let reversed = engine_for(Dataset::new(records));

    let a = forward.predict_match("Chelsea", "Everton").unwrap();
    let b = reversed.predict_match("Chelsea", "Everton").unwrap();
    assert!(close(a.expected.home, b.expected.home, 1e-12));
    assert!(close(a.expected.away, b.expected.away, 1e-12));
    assert_eq!(a.outcomes, b.outcomes);
    assert_eq!(a.secondary, b.secondary);
}

#[test]
fn away_only_team_cannot_be_predicted() {
    let mut records = fixture_dataset().records().to_vec();
    records.push(MatchRecord::new(
        NaiveDate::from_ymd_opt(2025, 10, 25).unwrap(),
        "Chelsea",
        "Fulham",
        1,
        0,
    ));
    let engine = engine_for(Dataset::new(records));

    assert!(!engine.list_teams().iter().any(|t| t == "Fulham"));
    let err = engine.calculate_strength("Fulham").unwrap_err();
    assert_eq!(
        err,
        EngineError::NoHomeMatches {
            team: "Fulham".to_string()
        }
    );
    assert!(err.is_insufficient_data());
    assert!(engine.predict_match("Arsenal", "Fulham").is_err());
    assert!(engine.predict_match("Fulham", "Arsenal").is_err());
}

#[test]
fn same_team_is_rejected() {
    let engine = engine_for(fixture_dataset());
    let err = engine.predict_match("Arsenal", "Arsenal").unwrap_err();
    assert!(matches!(err, EngineError::SameTeam { .. }));
    assert!(!err.is_insufficient_data());
}

#[test]
fn corner_total_is_exact_sum() {
    let engine = engine_for(fixture_dataset());
    let sec = engine.secondary_metrics("Arsenal", "Burnley").unwrap();
    assert!(close(sec.corners_home, (6.0 + 13.0 / 3.0) / 2.0, 1e-12));
    assert!(close(sec.corners_away, (16.0 / 3.0 + 4.0) / 2.0, 1e-12));
    assert_eq!(sec.corners_total, sec.corners_home + sec.corners_away);
    assert!(close(sec.cards_home, 1.2, 1e-12));
    assert!(close(sec.cards_away, 5.0 / 3.0, 1e-12));
    assert_eq!(sec.cards_total, sec.cards_home + sec.cards_away);
}

#[test]
fn larger_matrix_keeps_more_mass() {
    let dataset = fixture_dataset();
    let context = LeagueContext::new(LEAGUES[0], "2526", dataset.clone());
    let wide = StatisticalEngine::new(context, EngineConfig { matrix_size: 10 }).unwrap();
    let narrow = engine_for(dataset);

    let a = narrow.predict_match("Chelsea", "Arsenal").unwrap();
    let b = wide.predict_match("Chelsea", "Arsenal").unwrap();
    assert_eq!(b.matrix.size(), 10);
    assert!(b.matrix.total_mass() > a.matrix.total_mass());
    assert!(b.outcomes.sum() >= a.outcomes.sum());
}

#[test]
fn results_without_corner_columns_still_predict() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("league_basic.csv");
    let dataset = tipster_terminal::football_data::load_csv_file(&path).unwrap();
    let engine = engine_for(dataset);
    assert_eq!(engine.baseline().home_corners, 0.0);
    assert_eq!(engine.baseline().away_corners, 0.0);

    // Every side in this sample has played only once, at one venue.
    let err = engine.predict_match("Girona", "Villarreal").unwrap_err();
    assert!(matches!(err, EngineError::NoAwayMatches { .. }));
}
