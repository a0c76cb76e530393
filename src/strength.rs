use crate::baseline::{BaselineMetric, LeagueBaseline};
use crate::dataset::Dataset;
use crate::error::{EngineError, EngineResult};
use crate::numeric::mean;

/// Per-venue scoring and conceding rates relative to the league mean.
/// 1.0 is league average; attack above 1.0 is good, defense above 1.0 is bad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamStrength {
    pub attack_home: f64,
    pub defense_home: f64,
    pub attack_away: f64,
    pub defense_away: f64,
    pub home_matches: usize,
    pub away_matches: usize,
}

pub fn calculate_strength(
    dataset: &Dataset,
    baseline: &LeagueBaseline,
    team: &str,
) -> EngineResult<TeamStrength> {
    let home: Vec<_> = dataset.home_matches(team).collect();
    let away: Vec<_> = dataset.away_matches(team).collect();

    let (Some(scored_home), Some(conceded_home)) = (
        mean(home.iter().map(|m| f64::from(m.goals_home))),
        mean(home.iter().map(|m| f64::from(m.goals_away))),
    ) else {
        return Err(EngineError::NoHomeMatches {
            team: team.to_string(),
        });
    };
    let (Some(scored_away), Some(conceded_away)) = (
        mean(away.iter().map(|m| f64::from(m.goals_away))),
        mean(away.iter().map(|m| f64::from(m.goals_home))),
    ) else {
        return Err(EngineError::NoAwayMatches {
            team: team.to_string(),
        });
    };

    let home_goals = baseline.divisor(BaselineMetric::HomeGoals)?;
    let away_goals = baseline.divisor(BaselineMetric::AwayGoals)?;

    Ok(TeamStrength {
        attack_home: scored_home / home_goals,
        defense_home: conceded_home / away_goals,
        attack_away: scored_away / away_goals,
        defense_away: conceded_away / home_goals,
        home_matches: home.len(),
        away_matches: away.len(),
    })
}
