use anyhow::{Result, anyhow};
use statrs::statistics::Statistics;

/// Sample mean and sample standard deviation (n - 1) of a window
///
/// # Arguments
/// * `window` - Observations in the window, at least 2
pub fn sample_mean_std(window: &[f64]) -> Result<(f64, f64)> {
    if window.len() < 2 {
        return Err(anyhow!(
            "Need at least 2 observations for a sample standard deviation, got {}",
            window.len()
        ));
    }

    // statrs leaves rounding noise on identical observations
    if window.iter().all(|&x| x == window[0]) {
        return Ok((window[0], 0.0));
    }

    Ok((window.mean(), window.std_dev()))
}

/// Standardize `value` against a window's sample mean and deviation.
///
/// Returns `None` when the deviation is zero or the result is not finite.
pub fn zscore(value: f64, window: &[f64]) -> Option<f64> {
    let (mean, std_dev) = sample_mean_std(window).ok()?;
    if std_dev == 0.0 || !std_dev.is_finite() {
        return None;
    }

    let z = (value - mean) / std_dev;
    z.is_finite().then_some(z)
}

/// Calculate trailing z-scores over a series
///
/// The window ends at (and includes) each observation. Positions with fewer
/// than `window` observations so far are `None`, as are flat windows.
pub fn rolling_zscores(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window < 2 {
        return Err(anyhow!("Rolling window must be at least 2, got {}", window));
    }

    let zscores = values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i + 1 < window {
                return None;
            }
            zscore(value, &values[i + 1 - window..=i])
        })
        .collect();

    Ok(zscores)
}
