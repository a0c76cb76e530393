use std::collections::VecDeque;
use std::sync::Arc;

use crate::advisor::{MatchSuggestion, get_match_suggestion};
use crate::data_fetch::DataSource;
use crate::engine::StatisticalEngine;
use crate::error::EngineError;
use crate::form::{TeamForm, Venue};
use crate::leagues::{LEAGUES, League};

pub const TEAM_COLUMNS: usize = 4;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    LeaguePicker,
    Loading { league: League },
    TeamPicker,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStage {
    Home,
    Away,
}

#[derive(Debug, Clone)]
pub struct MatchReport {
    pub suggestion: MatchSuggestion,
    pub home_form: Option<TeamForm>,
    pub away_form: Option<TeamForm>,
}

#[derive(Debug, Clone)]
pub enum Report {
    Ready(Box<MatchReport>),
    Unavailable {
        home: String,
        away: String,
        reason: EngineError,
    },
}

/// Messages from the loader thread to the UI.
#[derive(Debug, Clone)]
pub enum Delta {
    LeagueReady {
        engine: Arc<StatisticalEngine>,
        source: DataSource,
    },
    LoadFailed {
        league: League,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadLeague(League),
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub league_selected: usize,
    pub engine: Option<Arc<StatisticalEngine>>,
    pub source: Option<DataSource>,
    pub teams: Vec<String>,
    pub team_selected: usize,
    pub stage: PickStage,
    pub home_pick: Option<String>,
    pub report: Option<Report>,
    pub form_games: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(5)
    }
}

impl AppState {
    pub fn new(form_games: usize) -> Self {
        Self {
            screen: Screen::LeaguePicker,
            league_selected: 0,
            engine: None,
            source: None,
            teams: Vec::new(),
            team_selected: 0,
            stage: PickStage::Home,
            home_pick: None,
            report: None,
            form_games: form_games.max(1),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn selected_league(&self) -> League {
        LEAGUES[self.league_selected.min(LEAGUES.len() - 1)]
    }

    pub fn selected_team(&self) -> Option<&str> {
        self.teams.get(self.team_selected).map(String::as_str)
    }

    /// Switch to the loading screen; the caller sends the returned command.
    pub fn begin_load(&mut self) -> ProviderCommand {
        let league = self.selected_league();
        self.screen = Screen::Loading { league };
        self.push_log(format!("[INFO] Loading {} ({})", league.name, league.code));
        ProviderCommand::LoadLeague(league)
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::LeaguePicker => {
                self.league_selected = (self.league_selected + 1) % LEAGUES.len();
            }
            Screen::TeamPicker => self.move_team(1),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::LeaguePicker => {
                self.league_selected = if self.league_selected == 0 {
                    LEAGUES.len() - 1
                } else {
                    self.league_selected - 1
                };
            }
            Screen::TeamPicker => self.move_team(-1),
            _ => {}
        }
    }

    /// Teams are laid out row-major in `TEAM_COLUMNS` columns; left/right
    /// steps one cell, up/down one row.
    pub fn select_left(&mut self) {
        if self.screen == Screen::TeamPicker {
            self.move_team(-1);
        }
    }

    pub fn select_right(&mut self) {
        if self.screen == Screen::TeamPicker {
            self.move_team(1);
        }
    }

    pub fn select_row_down(&mut self) {
        match self.screen {
            Screen::TeamPicker => self.move_team(TEAM_COLUMNS as isize),
            _ => self.select_next(),
        }
    }

    pub fn select_row_up(&mut self) {
        match self.screen {
            Screen::TeamPicker => self.move_team(-(TEAM_COLUMNS as isize)),
            _ => self.select_prev(),
        }
    }

    fn move_team(&mut self, step: isize) {
        let total = self.teams.len();
        if total == 0 {
            self.team_selected = 0;
            return;
        }
        let next = self.team_selected as isize + step;
        self.team_selected = next.rem_euclid(total as isize) as usize;
    }

    /// Enter on the team grid: first pick is the home side, second the away
    /// side, which runs the analysis.
    pub fn choose_team(&mut self) {
        let Some(team) = self.selected_team().map(str::to_string) else {
            return;
        };
        match self.stage {
            PickStage::Home => {
                self.home_pick = Some(team);
                self.stage = PickStage::Away;
            }
            PickStage::Away => {
                let Some(home) = self.home_pick.clone() else {
                    self.stage = PickStage::Home;
                    return;
                };
                if home == team {
                    self.push_log("[WARN] Home and away teams must differ");
                    return;
                }
                self.analyze(&home, &team);
            }
        }
    }

    pub fn analyze(&mut self, home: &str, away: &str) {
        let Some(engine) = self.engine.clone() else {
            self.push_log("[WARN] No league loaded");
            return;
        };
        let report = match get_match_suggestion(&engine, home, away) {
            Ok(suggestion) => {
                if let Some(reason) = suggestion.bundle.secondary_fallback.as_ref() {
                    self.push_log(format!("[INFO] Corners/cards unavailable: {reason}"));
                }
                let home_form = engine.team_form(home, self.form_games, Venue::Home).ok();
                let away_form = engine.team_form(away, self.form_games, Venue::Away).ok();
                self.push_log(format!(
                    "[INFO] {} -> {} tip(s)",
                    suggestion.title(),
                    suggestion.tips.len()
                ));
                Report::Ready(Box::new(MatchReport {
                    suggestion,
                    home_form,
                    away_form,
                }))
            }
            Err(reason) => {
                self.push_log(format!("[WARN] {home} vs {away}: {reason}"));
                Report::Unavailable {
                    home: home.to_string(),
                    away: away.to_string(),
                    reason,
                }
            }
        };
        self.report = Some(report);
        self.screen = Screen::Report;
    }

    /// Start a new fixture in the current league.
    pub fn new_fixture(&mut self) {
        if self.engine.is_none() {
            self.screen = Screen::LeaguePicker;
            return;
        }
        self.stage = PickStage::Home;
        self.home_pick = None;
        self.report = None;
        self.screen = Screen::TeamPicker;
    }

    pub fn back(&mut self) {
        match self.screen {
            Screen::Report => self.new_fixture(),
            Screen::TeamPicker => {
                if self.stage == PickStage::Away {
                    self.stage = PickStage::Home;
                    self.home_pick = None;
                } else {
                    self.screen = Screen::LeaguePicker;
                }
            }
            Screen::Loading { .. } | Screen::LeaguePicker => {}
        }
    }

    pub fn league_label(&self) -> Option<String> {
        self.engine.as_ref().map(|e| e.context().label())
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::LeagueReady { engine, source } => {
            let label = engine.context().label();
            // A late load for a league the user already left is dropped.
            if let Screen::Loading { league } = &state.screen {
                if *league != engine.context().league {
                    return;
                }
            } else {
                return;
            }
            state.teams = engine.list_teams();
            state.push_log(format!(
                "[INFO] {label}: {} teams, {} matches ({})",
                state.teams.len(),
                engine.dataset().len(),
                source.label()
            ));
            state.engine = Some(engine);
            state.source = Some(source);
            state.team_selected = 0;
            state.new_fixture();
        }
        Delta::LoadFailed { league, error } => {
            state.push_log(format!("[WARN] {} failed to load: {error}", league.name));
            if matches!(&state.screen, Screen::Loading { league: l } if *l == league) {
                state.screen = Screen::LeaguePicker;
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
