//! Wilder-style RSI using recursive exponential smoothing
//!
//! Matches the charting-platform RSI that users compare alerts against:
//! gains and losses are smoothed with alpha = 1/period using the recursive
//! (non-adjusted) EMA form, and the average stays undefined until `period`
//! samples have been observed.

/// Value used where the oscillator cannot be defined at all
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI of a close series.
///
/// The output has the same length as `closes` and every value lies in
/// [0, 100]. Undefined positions take the next defined value; positions
/// with no defined value after them are set to [`NEUTRAL_RSI`].
pub fn compute_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }
    let period = period.max(1);
    let alpha = 1.0 / period as f64;

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(f64::NAN);
    losses.push(f64::NAN);
    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        if delta.is_nan() {
            gains.push(f64::NAN);
            losses.push(f64::NAN);
        } else {
            gains.push(delta.max(0.0));
            losses.push((-delta).max(0.0));
        }
    }

    let avg_gain = ewm_mean(&gains, alpha, period);
    let avg_loss = ewm_mean(&losses, alpha, period);

    let mut rsi: Vec<f64> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            // A zero loss average is undefined, not an infinite RS.
            if loss == 0.0 {
                return f64::NAN;
            }
            let rs = gain / loss;
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect();

    backfill(&mut rsi);
    for value in rsi.iter_mut() {
        if value.is_nan() {
            *value = NEUTRAL_RSI;
        }
    }
    rsi
}

/// Recursive exponential mean with a `min_periods` warm-up.
///
/// Seeded with the first defined sample. Undefined samples after the seed
/// still decay the previous weight, so the next defined sample weighs more.
pub(crate) fn ewm_mean(values: &[f64], alpha: f64, min_periods: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return out;
    };
    let min_periods = min_periods.max(1);
    let new_wt = alpha;
    let old_wt_factor = 1.0 - alpha;

    let mut weighted = first;
    let mut nobs = usize::from(!first.is_nan());
    let mut old_wt = 1.0;
    out.push(if nobs >= min_periods { weighted } else { f64::NAN });

    for &cur in &values[1..] {
        let is_observation = !cur.is_nan();
        nobs += usize::from(is_observation);
        if !weighted.is_nan() {
            old_wt *= old_wt_factor;
            if is_observation {
                // Skipping equal values keeps constant runs exact.
                if weighted != cur {
                    weighted = (old_wt * weighted + new_wt * cur) / (old_wt + new_wt);
                }
                old_wt = 1.0;
            }
        } else if is_observation {
            weighted = cur;
        }
        out.push(if nobs >= min_periods { weighted } else { f64::NAN });
    }
    out
}

/// Fill each NaN with the next non-NaN value
fn backfill(values: &mut [f64]) {
    let mut next = f64::NAN;
    for value in values.iter_mut().rev() {
        if value.is_nan() {
            *value = next;
        } else {
            next = *value;
        }
    }
}
