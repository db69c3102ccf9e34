//! Clamp and transition rules for the progress status.
//!
//! A status is `Option<f64>`: `None` while idle, otherwise a value in
//! `[minimum, 1)`. Reaching 1 is never observable; it collapses to `None`.

/// Increment buckets used by [`trickle_increment`]: `(upper bound, step)`.
const TRICKLE_STEPS: &[(f64, f64)] = &[(0.2, 0.1), (0.5, 0.04), (0.8, 0.02), (0.99, 0.005)];

/// Clamps `n` into `[min, max]`. NaN clamps to `min`.
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    if n.is_nan() || n < min {
        min
    } else if n > max {
        max
    } else {
        n
    }
}

/// Computes the status produced by a request to move to `n`.
///
/// Returns `None` when the request reaches or exceeds 100%.
pub fn next_status(n: f64, minimum: f64) -> Option<f64> {
    let n = clamp(n, minimum, 1.0);
    if n == 1.0 {
        None
    } else {
        Some(n)
    }
}

/// The default amount added by an argument-less `inc`.
///
/// Large steps early, smaller ones later. Each step covers at most half of the
/// remaining distance, so repeated increments approach 1 without reaching it.
pub fn trickle_increment(status: f64) -> f64 {
    let gap = (1.0 - status).max(0.0);
    let step = TRICKLE_STEPS
        .iter()
        .find(|(bound, _)| status < *bound)
        .map_or(gap, |(_, step)| *step)
        .min(gap / 2.0);
    // Past f64 resolution the sum would round up to 1.
    if status + step < 1.0 {
        step
    } else {
        0.0
    }
}

/// Bar offset in percent for a status: 0 → -100, 1 → 0.
pub fn to_bar_percent(n: f64) -> f64 {
    (n - 1.0) * 100.0
}
