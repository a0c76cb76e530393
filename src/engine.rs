use tracing::debug;

use crate::baseline::{LeagueBaseline, compute_league_baseline};
use crate::dataset::Dataset;
use crate::error::{EngineError, EngineResult};
use crate::form::{TeamForm, Venue, team_form};
use crate::goal_expectancy::{ExpectedGoals, expected_goals};
use crate::leagues::LeagueContext;
use crate::outcome::{OutcomeProbs, aggregate_outcomes};
use crate::score_matrix::{DEFAULT_MATRIX_SIZE, ScoreMatrix};
use crate::secondary::{SecondaryMetrics, estimate_secondary};
use crate::strength::{TeamStrength, calculate_strength};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scorelines 0..matrix_size per side are modelled.
    pub matrix_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matrix_size: DEFAULT_MATRIX_SIZE,
        }
    }
}

/// Everything computed for one fixture.
#[derive(Debug, Clone)]
pub struct PredictionBundle {
    pub home_team: String,
    pub away_team: String,
    pub home_strength: TeamStrength,
    pub away_strength: TeamStrength,
    pub expected: ExpectedGoals,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub matrix: ScoreMatrix,
    pub outcomes: OutcomeProbs,
    pub secondary: SecondaryMetrics,
    /// Why `secondary` is all zeros, if it is a fallback.
    pub secondary_fallback: Option<EngineError>,
}

/// Forecasting engine for one league season.
///
/// The baseline is computed once here; nothing is mutated afterwards, so the
/// engine can be shared freely (the TUI keeps it in an `Arc`).
#[derive(Debug, Clone)]
pub struct StatisticalEngine {
    context: LeagueContext,
    baseline: LeagueBaseline,
    config: EngineConfig,
}

impl StatisticalEngine {
    pub fn new(context: LeagueContext, config: EngineConfig) -> EngineResult<Self> {
        let baseline = compute_league_baseline(&context.dataset)?;
        Ok(Self {
            context,
            baseline,
            config,
        })
    }

    pub fn context(&self) -> &LeagueContext {
        &self.context
    }

    pub fn dataset(&self) -> &Dataset {
        &self.context.dataset
    }

    pub fn baseline(&self) -> &LeagueBaseline {
        &self.baseline
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn list_teams(&self) -> Vec<String> {
        self.dataset().list_teams()
    }

    pub fn calculate_strength(&self, team: &str) -> EngineResult<TeamStrength> {
        calculate_strength(self.dataset(), &self.baseline, team)
    }

    pub fn secondary_metrics(&self, home: &str, away: &str) -> EngineResult<SecondaryMetrics> {
        estimate_secondary(self.dataset(), home, away)
    }

    pub fn team_form(&self, team: &str, games: usize, venue: Venue) -> EngineResult<TeamForm> {
        team_form(self.dataset(), team, games, venue)
    }

    pub fn predict_match(&self, home: &str, away: &str) -> EngineResult<PredictionBundle> {
        if home == away {
            return Err(EngineError::SameTeam {
                team: home.to_string(),
            });
        }
        let home_strength = self.calculate_strength(home)?;
        let away_strength = self.calculate_strength(away)?;

        let expected = expected_goals(&home_strength, &away_strength, &self.baseline);
        let (lambda_home, lambda_away) = expected.rounded();
        let matrix = ScoreMatrix::build(expected.home, expected.away, self.config.matrix_size);
        let outcomes = aggregate_outcomes(&matrix);

        let (secondary, secondary_fallback) = match self.secondary_metrics(home, away) {
            Ok(metrics) => (metrics, None),
            Err(reason) => {
                debug!(%reason, home, away, "secondary metrics unavailable, using zeros");
                (SecondaryMetrics::zero(), Some(reason))
            }
        };

        Ok(PredictionBundle {
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_strength,
            away_strength,
            expected,
            lambda_home,
            lambda_away,
            matrix,
            outcomes,
            secondary,
            secondary_fallback,
        })
    }
}
