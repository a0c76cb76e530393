/// Round half away from zero to `decimals` places.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Mean over the present values only; 0.0 when none are present.
pub fn mean_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<u32>>,
{
    mean(values.into_iter().flatten().map(f64::from)).unwrap_or(0.0)
}
