use crate::baseline::LeagueBaseline;
use crate::numeric::round_dp;
use crate::strength::TeamStrength;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

impl ExpectedGoals {
    /// Two-decimal values as shown to users.
    pub fn rounded(&self) -> (f64, f64) {
        (round_dp(self.home, 2), round_dp(self.away, 2))
    }

    pub fn total(&self) -> f64 {
        self.home + self.away
    }
}

/// Static multiplicative model: home attack x away defense x league mean.
/// Every match in the season weighs the same.
pub fn expected_goals(
    home: &TeamStrength,
    away: &TeamStrength,
    baseline: &LeagueBaseline,
) -> ExpectedGoals {
    ExpectedGoals {
        home: home.attack_home * away.defense_away * baseline.home_goals,
        away: away.attack_away * home.defense_home * baseline.away_goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(attack_home: f64, defense_home: f64, attack_away: f64, defense_away: f64) -> TeamStrength {
        TeamStrength {
            attack_home,
            defense_home,
            attack_away,
            defense_away,
            home_matches: 5,
            away_matches: 5,
        }
    }

    fn baseline(home_goals: f64, away_goals: f64) -> LeagueBaseline {
        LeagueBaseline {
            sample_matches: 10,
            home_goals,
            away_goals,
            home_corners: 0.0,
            away_corners: 0.0,
        }
    }

    #[test]
    fn product_of_ratios_and_league_mean() {
        let home = strength(1.20, 0.80, 1.0, 1.0);
        let away = strength(1.0, 1.0, 1.10, 0.90);
        let xg = expected_goals(&home, &away, &baseline(1.50, 1.10));
        assert_eq!(xg.rounded(), (1.62, 0.97));
    }

    #[test]
    fn average_teams_reproduce_league_means() {
        let avg = strength(1.0, 1.0, 1.0, 1.0);
        let xg = expected_goals(&avg, &avg, &baseline(1.55, 1.21));
        assert!((xg.home - 1.55).abs() < 1e-12);
        assert!((xg.away - 1.21).abs() < 1e-12);
        assert!((xg.total() - 2.76).abs() < 1e-12);
    }
}
