use std::fmt;

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{EngineError, EngineResult};
use crate::numeric::{mean, mean_present};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineMetric {
    HomeGoals,
    AwayGoals,
    HomeCorners,
    AwayCorners,
}

impl BaselineMetric {
    pub const ALL: [BaselineMetric; 4] = [
        BaselineMetric::HomeGoals,
        BaselineMetric::AwayGoals,
        BaselineMetric::HomeCorners,
        BaselineMetric::AwayCorners,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaselineMetric::HomeGoals => "home_goals",
            BaselineMetric::AwayGoals => "away_goals",
            BaselineMetric::HomeCorners => "home_corners",
            BaselineMetric::AwayCorners => "away_corners",
        }
    }
}

impl fmt::Display for BaselineMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Season-wide per-match means used to normalize team strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueBaseline {
    pub sample_matches: usize,
    pub home_goals: f64,
    pub away_goals: f64,
    // Zero when the league publishes no corner columns.
    pub home_corners: f64,
    pub away_corners: f64,
}

impl LeagueBaseline {
    pub fn get(&self, metric: BaselineMetric) -> f64 {
        match metric {
            BaselineMetric::HomeGoals => self.home_goals,
            BaselineMetric::AwayGoals => self.away_goals,
            BaselineMetric::HomeCorners => self.home_corners,
            BaselineMetric::AwayCorners => self.away_corners,
        }
    }

    /// Returns the metric's mean, or a `ZeroBaseline` error if dividing by it
    /// would be undefined.
    pub fn divisor(&self, metric: BaselineMetric) -> EngineResult<f64> {
        let v = self.get(metric);
        if v > 0.0 && v.is_finite() {
            Ok(v)
        } else {
            Err(EngineError::ZeroBaseline { metric })
        }
    }
}

pub fn compute_league_baseline(dataset: &Dataset) -> EngineResult<LeagueBaseline> {
    let records = dataset.records();
    let home_goals = mean(records.iter().map(|m| f64::from(m.goals_home)))
        .ok_or(EngineError::EmptyDataset)?;
    let away_goals = mean(records.iter().map(|m| f64::from(m.goals_away)))
        .ok_or(EngineError::EmptyDataset)?;

    let out = LeagueBaseline {
        sample_matches: records.len(),
        home_goals,
        away_goals,
        home_corners: mean_present(records.iter().map(|m| m.corners_home)),
        away_corners: mean_present(records.iter().map(|m| m.corners_away)),
    };
    debug!(
        matches = out.sample_matches,
        home_goals = out.home_goals,
        away_goals = out.away_goals,
        "league baseline computed"
    );
    Ok(out)
}
