//! Alert text and dedup keys

use crate::indicator::DivergenceSignal;

/// Markdown alert text for Telegram
pub fn format_signal_message(signal: &DivergenceSignal) -> String {
    format!(
        "*RSI Bullish Divergence*\n\
         {} | {} | {}\n\
         RSI: {:.2} -> {:.2} (HL)\n\
         Low: {:.4} -> {:.4} (LL)",
        signal.symbol,
        signal.timeframe,
        signal.bar_time.format("%Y-%m-%d %H:%M UTC"),
        signal.prev_rsi_pivot,
        signal.rsi_at_pivot,
        signal.prev_price_pivot,
        signal.price_at_pivot,
    )
}

/// `symbol:timeframe:bar_time` with an RFC 3339 bar time
pub fn dedup_key(signal: &DivergenceSignal) -> String {
    format!(
        "{}:{}:{}",
        signal.symbol,
        signal.timeframe,
        signal.bar_time.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candle::Timeframe;
    use chrono::{TimeZone, Utc};

    fn signal() -> DivergenceSignal {
        DivergenceSignal {
            symbol: "BTCTRY".to_string(),
            timeframe: Timeframe::FourHours,
            bar_time: Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap(),
            rsi_at_pivot: 34.567,
            price_at_pivot: 2_050_000.125,
            prev_rsi_pivot: 28.1,
            prev_price_pivot: 2_100_000.0,
            bar_index: 140,
            prev_bar_index: 120,
        }
    }

    #[test]
    fn test_format_message() {
        let text = format_signal_message(&signal());
        assert_eq!(
            text,
            "*RSI Bullish Divergence*\n\
             BTCTRY | 4h | 2024-05-06 08:00 UTC\n\
             RSI: 28.10 -> 34.57 (HL)\n\
             Low: 2100000.0000 -> 2050000.1250 (LL)"
        );
    }

    #[test]
    fn test_dedup_key() {
        assert_eq!(dedup_key(&signal()), "BTCTRY:4h:2024-05-06T08:00:00+00:00");
    }
}
