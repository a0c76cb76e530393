/// Scorelines 0..=5 per side.
pub const DEFAULT_MATRIX_SIZE: usize = 6;

/// Joint scoreline probabilities for one fixture, treating both sides' goal
/// counts as independent Poisson variables. Goal counts at or above `size`
/// are dropped, so the grid sums to slightly less than 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    size: usize,
    // Row-major: cells[h * size + a].
    cells: Vec<f64>,
    home_pmf: Vec<f64>,
    away_pmf: Vec<f64>,
}

impl ScoreMatrix {
    pub fn build(lambda_home: f64, lambda_away: f64, size: usize) -> Self {
        let size = size.max(1);
        let home_pmf = poisson_pmf(lambda_home, size);
        let away_pmf = poisson_pmf(lambda_away, size);

        let mut cells = Vec::with_capacity(size * size);
        for p_h in &home_pmf {
            for p_a in &away_pmf {
                cells.push(p_h * p_a);
            }
        }

        Self {
            size,
            cells,
            home_pmf,
            away_pmf,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, home_goals: usize, away_goals: usize) -> f64 {
        if home_goals >= self.size || away_goals >= self.size {
            return 0.0;
        }
        self.cells[home_goals * self.size + away_goals]
    }

    /// `(home_goals, away_goals, probability)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx / self.size, idx % self.size, *p))
    }

    pub fn sum_where<F>(&self, mut pred: F) -> f64
    where
        F: FnMut(usize, usize) -> bool,
    {
        self.iter()
            .filter(|(h, a, _)| pred(*h, *a))
            .map(|(_, _, p)| p)
            .sum()
    }

    pub fn home_win(&self) -> f64 {
        self.sum_where(|h, a| h > a)
    }

    pub fn draw(&self) -> f64 {
        self.sum_where(|h, a| h == a)
    }

    pub fn away_win(&self) -> f64 {
        self.sum_where(|h, a| h < a)
    }

    /// Total goals strictly above `line` (e.g. 2.5).
    pub fn over(&self, line: f64) -> f64 {
        self.sum_where(|h, a| (h + a) as f64 > line)
    }

    pub fn both_teams_score(&self) -> f64 {
        self.sum_where(|h, a| h >= 1 && a >= 1)
    }

    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Probability dropped by the bound, computed from the marginals:
    /// `1 - P(H < size) * P(A < size)`.
    pub fn truncated_mass(&self) -> f64 {
        let home: f64 = self.home_pmf.iter().sum();
        let away: f64 = self.away_pmf.iter().sum();
        (1.0 - home * away).max(0.0)
    }

    /// Scoreline with the highest single-cell probability.
    pub fn most_likely_score(&self) -> (usize, usize, f64) {
        self.iter()
            .fold((0, 0, f64::MIN), |best, cur| if cur.2 > best.2 { cur } else { best })
    }
}

/// P(X = k) for k in 0..len, with no tail folded into the last entry.
pub fn poisson_pmf(lambda: f64, len: usize) -> Vec<f64> {
    let lambda = if lambda.is_finite() { lambda.max(0.0) } else { 0.0 };
    let mut out = vec![0.0; len];
    if len == 0 {
        return out;
    }
    out[0] = (-lambda).exp();
    for k in 1..len {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}
