//! Distributions of the number of steps before an episode terminates
//!
//! With a per-step termination probability `p`, the step at which an episode
//! ends is geometric: `P(K = k) = (1 - p)^(k - 1) p`. With a hard step limit
//! and no early termination, all mass sits on the limit `k0`.

use statrs::distribution::{Discrete, Geometric};

use super::samples::Series;
use crate::{Error, Result};

/// Geometric PMF for `k = 1..=max_k`.
///
/// # Errors
///
/// Returns [`Error::InvalidProbability`] unless `0 < p <= 1`.
pub fn geometric_pmf(p: f64, max_k: u64) -> Result<Series> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(Error::InvalidProbability { value: p });
    }
    let dist = Geometric::new(p).map_err(|_| Error::InvalidProbability { value: p })?;

    let x: Vec<u64> = (1..=max_k).collect();
    let values = x.iter().map(|&k| Some(dist.pmf(k))).collect();
    Ok(Series { x, values })
}

/// Degenerate PMF with all mass at `k0`, for `k = 1..=max_k`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] unless `1 <= k0 <= max_k`.
pub fn degenerate_pmf(k0: u64, max_k: u64) -> Result<Series> {
    if k0 == 0 || k0 > max_k {
        return Err(Error::InvalidConfiguration {
            message: format!("k0 = {k0} must lie in 1..={max_k}"),
        });
    }
    let x: Vec<u64> = (1..=max_k).collect();
    let values = x
        .iter()
        .map(|&k| Some(if k == k0 { 1.0 } else { 0.0 }))
        .collect();
    Ok(Series { x, values })
}
