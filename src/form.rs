use crate::dataset::{Dataset, MatchRecord};
use crate::error::{EngineError, EngineResult};
use crate::numeric::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
    All,
}

impl Venue {
    pub fn label(self) -> &'static str {
        match self {
            Venue::Home => "home",
            Venue::Away => "away",
            Venue::All => "all",
        }
    }
}

/// Averages over a team's most recent matches. Shown alongside a prediction;
/// the model itself never looks at it.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamForm {
    pub team: String,
    pub venue: Venue,
    pub games: usize,
    pub goals_for: f64,
    pub goals_against: f64,
    pub shots_on_target: f64,
    pub corners: f64,
    pub cards: f64,
}

impl TeamForm {
    pub fn summary(&self) -> String {
        format!(
            "Last {} ({}): GF {:.2} GA {:.2} SoT {:.2} Corners {:.2} Cards {:.2}",
            self.games,
            self.venue.label(),
            self.goals_for,
            self.goals_against,
            self.shots_on_target,
            self.corners,
            self.cards
        )
    }
}

pub fn team_form(dataset: &Dataset, team: &str, games: usize, venue: Venue) -> EngineResult<TeamForm> {
    let mut matches: Vec<&MatchRecord> = dataset
        .records()
        .iter()
        .filter(|m| match venue {
            Venue::Home => m.home_team == team,
            Venue::Away => m.away_team == team,
            Venue::All => m.involves(team),
        })
        .collect();
    // Stable sort keeps source order for same-day rows.
    matches.sort_by_key(|m| m.date);
    let skip = matches.len().saturating_sub(games.max(1));
    let recent = &matches[skip..];
    if recent.is_empty() {
        return Err(EngineError::NoMatches {
            team: team.to_string(),
        });
    }

    let mut goals_for = 0u32;
    let mut goals_against = 0u32;
    let mut shots = 0u32;
    let mut corners = 0u32;
    let mut cards = 0u32;
    for m in recent {
        let at_home = m.home_team == team;
        let (gf, ga, sot, cor, crd) = if at_home {
            (m.goals_home, m.goals_away, m.shots_on_target_home, m.corners_home, m.cards_home)
        } else {
            (m.goals_away, m.goals_home, m.shots_on_target_away, m.corners_away, m.cards_away)
        };
        goals_for += gf;
        goals_against += ga;
        shots += sot.unwrap_or(0);
        corners += cor.unwrap_or(0);
        cards += crd.unwrap_or(0);
    }

    let n = recent.len() as f64;
    let avg = |total: u32| round_dp(f64::from(total) / n, 2);
    Ok(TeamForm {
        team: team.to_string(),
        venue,
        games: recent.len(),
        goals_for: avg(goals_for),
        goals_against: avg(goals_against),
        shots_on_target: avg(shots),
        corners: avg(corners),
        cards: avg(cards),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    fn league() -> Dataset {
        Dataset::new(vec![
            MatchRecord::new(day(20), "Lyon", "Nice", 3, 0).with_corners(9, 1),
            MatchRecord::new(day(1), "Lyon", "Lens", 0, 2).with_corners(2, 6),
            MatchRecord::new(day(10), "Nice", "Lyon", 1, 1).with_corners(4, 5),
            MatchRecord::new(day(15), "Lens", "Nice", 2, 2),
        ])
    }

    #[test]
    fn takes_most_recent_by_date() {
        let f = team_form(&league(), "Lyon", 2, Venue::All).unwrap();
        assert_eq!(f.games, 2);
        // 10th (away 1-1) and 20th (home 3-0)
        assert_eq!(f.goals_for, 2.0);
        assert_eq!(f.goals_against, 0.5);
        assert_eq!(f.corners, 7.0);
    }

    #[test]
    fn averages_over_matches_actually_played() {
        let f = team_form(&league(), "Lyon", 5, Venue::Home).unwrap();
        assert_eq!(f.games, 2);
        assert_eq!(f.goals_for, 1.5);
        assert_eq!(f.venue, Venue::Home);
    }

    #[test]
    fn unknown_team_has_no_form() {
        let err = team_form(&league(), "Metz", 5, Venue::All).unwrap_err();
        assert!(matches!(err, EngineError::NoMatches { .. }));
    }
}
