use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tipster_terminal::config::AppConfig;
use tipster_terminal::data_fetch::{DataSource, save_local};
use tipster_terminal::engine::{EngineConfig, StatisticalEngine};
use tipster_terminal::error::EngineError;
use tipster_terminal::feed::handle_command;
use tipster_terminal::football_data::parse_results_csv;
use tipster_terminal::leagues::{LEAGUES, League, LeagueContext};
use tipster_terminal::state::{
    AppState, Delta, PickStage, ProviderCommand, Report, Screen, apply_delta,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_engine(league: League) -> Arc<StatisticalEngine> {
    let dataset = parse_results_csv(&read_fixture("league_full.csv")).expect("fixture should parse");
    let engine = StatisticalEngine::new(
        LeagueContext::new(league, "2526", dataset),
        EngineConfig::default(),
    )
    .expect("engine should build");
    Arc::new(engine)
}

fn loaded_state() -> AppState {
    let mut state = AppState::new(5);
    let cmd = state.begin_load();
    let ProviderCommand::LoadLeague(league) = cmd;
    assert_eq!(league, LEAGUES[0]);
    apply_delta(
        &mut state,
        Delta::LeagueReady {
            engine: fixture_engine(league),
            source: DataSource::LocalFile,
        },
    );
    state
}

#[test]
fn league_ready_opens_team_picker() {
    let state = loaded_state();
    assert_eq!(state.screen, Screen::TeamPicker);
    assert_eq!(state.teams, vec!["Arsenal", "Burnley", "Chelsea", "Everton"]);
    assert_eq!(state.stage, PickStage::Home);
    assert_eq!(state.source, Some(DataSource::LocalFile));
    assert_eq!(state.league_label().as_deref(), Some("Premier League (England) 25/26"));
    assert!(state.logs.iter().any(|l| l.contains("4 teams, 10 matches")));
}

#[test]
fn picking_two_teams_produces_report() {
    let mut state = loaded_state();
    state.choose_team();
    assert_eq!(state.stage, PickStage::Away);
    assert_eq!(state.home_pick.as_deref(), Some("Arsenal"));

    // Same side twice is refused.
    state.choose_team();
    assert_eq!(state.screen, Screen::TeamPicker);
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    state.select_right();
    assert_eq!(state.selected_team(), Some("Burnley"));
    state.choose_team();
    assert_eq!(state.screen, Screen::Report);
    let Some(Report::Ready(report)) = state.report.as_ref() else {
        panic!("expected a ready report");
    };
    assert_eq!(report.suggestion.title(), "Arsenal vs Burnley");
    assert!(report.suggestion.tips.is_empty());
    assert_eq!(report.home_form.as_ref().map(|f| f.games), Some(5));
    assert_eq!(report.away_form.as_ref().map(|f| f.games), Some(3));

    state.back();
    assert_eq!(state.screen, Screen::TeamPicker);
    assert_eq!(state.stage, PickStage::Home);
    assert!(state.report.is_none());
}

#[test]
fn unknown_side_gives_unavailable_report() {
    let mut state = loaded_state();
    state.analyze("Arsenal", "Wolves");
    assert_eq!(state.screen, Screen::Report);
    match state.report.as_ref() {
        Some(Report::Unavailable { reason, .. }) => {
            assert_eq!(
                *reason,
                EngineError::NoHomeMatches {
                    team: "Wolves".to_string()
                }
            );
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn team_grid_wraps() {
    let mut state = loaded_state();
    state.select_left();
    assert_eq!(state.selected_team(), Some("Everton"));
    state.select_row_down();
    assert_eq!(state.selected_team(), Some("Everton"));
    state.select_right();
    assert_eq!(state.selected_team(), Some("Arsenal"));
}

#[test]
fn stale_league_ready_is_ignored() {
    let mut state = AppState::new(5);
    apply_delta(
        &mut state,
        Delta::LeagueReady {
            engine: fixture_engine(LEAGUES[0]),
            source: DataSource::Download,
        },
    );
    assert_eq!(state.screen, Screen::LeaguePicker);
    assert!(state.engine.is_none());

    state.select_next();
    let _ = state.begin_load();
    apply_delta(
        &mut state,
        Delta::LeagueReady {
            engine: fixture_engine(LEAGUES[0]),
            source: DataSource::Download,
        },
    );
    assert!(matches!(state.screen, Screen::Loading { league } if league == LEAGUES[1]));
    assert!(state.engine.is_none());
}

#[test]
fn load_failure_returns_to_league_picker() {
    let mut state = AppState::new(5);
    let _ = state.begin_load();
    apply_delta(
        &mut state,
        Delta::LoadFailed {
            league: LEAGUES[0],
            error: "offline".to_string(),
        },
    );
    assert_eq!(state.screen, Screen::LeaguePicker);
    assert!(state.logs.back().is_some_and(|l| l.contains("failed to load: offline")));

    apply_delta(&mut state, Delta::Log("[INFO] hello".to_string()));
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] hello"));
}

#[test]
fn provider_loads_local_copy_offline() {
    let dir = std::env::temp_dir().join(format!("tipster_feed_{}", std::process::id()));
    let cfg = AppConfig {
        data_dir: dir.clone(),
        season: "9902".to_string(),
        offline: true,
        ..AppConfig::default()
    };
    let league = League::by_code("E0").unwrap();
    save_local(
        &league.local_csv_path(&cfg.data_dir, &cfg.season),
        &read_fixture("league_full.csv"),
    )
    .unwrap();

    match handle_command(&cfg, ProviderCommand::LoadLeague(league)) {
        Delta::LeagueReady { engine, source } => {
            assert_eq!(source, DataSource::LocalFile);
            assert_eq!(engine.dataset().len(), 10);
            assert_eq!(engine.context().season, "9902");
        }
        other => panic!("unexpected delta {other:?}"),
    }

    let missing = League::by_code("P1").unwrap();
    assert!(matches!(
        handle_command(&cfg, ProviderCommand::LoadLeague(missing)),
        Delta::LoadFailed { .. }
    ));
    let _ = fs::remove_dir_all(&dir);
}
