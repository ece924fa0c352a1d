pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let sum: f64 = samples.iter().sum();
        Some(sum / samples.len() as f64)
    }

    /// Rounds to `decimals` places with ties going to the even neighbour.
    pub fn round_half_even(value: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        (value * scale).round_ties_even() / scale
    }

    /// Angle in whole tenths of a degree, rounded half-to-even.
    pub fn tenths(value: f64) -> i64 {
        (value * 10.0).round_ties_even() as i64
    }
}
