//! OHLCV resampling into coarser UTC-aligned buckets

use super::{Candle, CandleSeries};
use chrono::{DateTime, Duration, Utc};

/// Aggregate a series into buckets of `bucket` length.
///
/// Buckets are aligned to the UNIX epoch, which for any bucket that divides
/// a day means midnight-aligned UTC bins. Each bucket takes the first open,
/// the max high, the min low, the last close and the summed volume. Buckets
/// without bars are omitted.
pub fn resample_ohlcv(series: &CandleSeries, bucket: Duration) -> CandleSeries {
    let width = bucket.num_seconds();
    if width <= 0 || series.is_empty() {
        return series.clone();
    }

    let mut out: Vec<Candle> = Vec::new();
    for candle in series.candles() {
        let start = bucket_start(candle.timestamp, width);
        match out.last_mut() {
            Some(current) if current.timestamp == start => {
                current.high = current.high.max(candle.high);
                current.low = current.low.min(candle.low);
                current.close = candle.close;
                current.volume += candle.volume;
            }
            _ => out.push(Candle {
                timestamp: start,
                ..*candle
            }),
        }
    }

    // Input is strictly increasing, so bucket starts are too.
    CandleSeries::new(out).unwrap_or_default()
}

fn bucket_start(ts: DateTime<Utc>, width: i64) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let start = secs - secs.rem_euclid(width);
    DateTime::from_timestamp(start, 0).unwrap_or(ts)
}
