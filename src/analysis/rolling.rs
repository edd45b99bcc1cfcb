//! Trailing-window statistics over series with gaps

use statrs::statistics::Statistics;

/// Window used by the charts unless told otherwise.
pub const DEFAULT_WINDOW: usize = 10;

fn windows(values: &[Option<f64>], window: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
    let window = window.max(1);
    (0..values.len()).map(move |end| {
        let start = (end + 1).saturating_sub(window);
        values[start..=end].iter().flatten().copied().collect()
    })
}

/// Trailing moving average over the last `window` entries.
///
/// Missing entries are skipped inside each window; a window without any value
/// yields `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    windows(values, window)
        .map(|w| if w.is_empty() { None } else { Some(w.mean()) })
        .collect()
}

/// Trailing sample variance (n - 1 denominator) over the last `window` entries.
///
/// A window with fewer than two values yields `None`.
pub fn rolling_variance(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    windows(values, window)
        .map(|w| if w.len() < 2 { None } else { Some(w.variance()) })
        .collect()
}
