//! Technical indicators and direction labels derived from a price series.

use crate::domain::market::PriceSeries;
use crate::domain::ml::EnrichedRow;
use ta::Next;
use ta::indicators::SimpleMovingAverage;
use tracing::debug;

pub const SMA_FAST_PERIOD: usize = 10;
pub const SMA_SLOW_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;

/// Enriches `series` with SMA_10, SMA_50, RSI_14 and the next-bar label.
///
/// Rows where any indicator is still warming up are dropped, as is the last
/// bar (it has no successor to label against). Output stays chronological.
pub fn enrich(series: &PriceSeries) -> Vec<EnrichedRow> {
    let closes = series.closes();
    let n = closes.len();
    if n < 2 {
        return Vec::new();
    }

    let sma_fast = rolling_sma(&closes, SMA_FAST_PERIOD);
    let sma_slow = rolling_sma(&closes, SMA_SLOW_PERIOD);
    let rsi = rolling_rsi(&closes, RSI_PERIOD);

    let rows: Vec<EnrichedRow> = (0..n - 1)
        .filter_map(|i| {
            let (Some(sma_10), Some(sma_50), Some(rsi_14)) = (sma_fast[i], sma_slow[i], rsi[i])
            else {
                return None;
            };
            Some(EnrichedRow {
                bar: series.bars[i].clone(),
                sma_10,
                sma_50,
                rsi_14,
                label: u8::from(closes[i + 1] > closes[i]),
            })
        })
        .collect();

    debug!(
        "Indicators: {} bars -> {} enriched rows for {}",
        n,
        rows.len(),
        series.ticker
    );
    rows
}

/// Trailing simple moving average, `None` until `period` values are seen.
pub fn rolling_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(period) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let avg = sma.next(v);
            (i + 1 >= period).then_some(avg)
        })
        .collect()
}

/// Relative strength index over simple (not Wilder-smoothed) averages.
///
/// The first bar has no predecessor; its delta counts as zero gain and zero
/// loss, so the first value is available at index `period - 1`.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let delta = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    // Window sums are recomputed per bar so a flat window sums to exactly zero.
    (0..closes.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let start = i + 1 - period;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
            rsi_from_averages(avg_gain, avg_loss)
        })
        .collect()
}

/// RSI = 100 - 100 / (1 + avg_gain / avg_loss).
///
/// With no losses in the window the ratio is infinite and RSI saturates at
/// 100. A window with neither gains nor losses has no defined RSI.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 21, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000 + i as u64,
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    /// Oscillating series with no flat stretches
    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_output_length_drops_warmup_and_tail() {
        let rows = enrich(&series_from(&wavy(60)));
        assert_eq!(rows.len(), 60 - (SMA_SLOW_PERIOD - 1) - 1);

        let rows = enrich(&series_from(&wavy(300)));
        assert_eq!(rows.len(), 250);
    }

    #[test]
    fn test_short_series_yields_nothing() {
        assert!(enrich(&series_from(&wavy(50))).is_empty());
        assert!(enrich(&series_from(&[100.0])).is_empty());
        assert!(enrich(&series_from(&[])).is_empty());
    }

    #[test]
    fn test_first_row_is_the_fiftieth_bar() {
        let series = series_from(&wavy(80));
        let rows = enrich(&series);
        assert_eq!(rows[0].bar, series.bars[SMA_SLOW_PERIOD - 1]);
        assert_eq!(rows.last().unwrap().bar, series.bars[series.len() - 2]);
    }

    #[test]
    fn test_sma_values_match_trailing_mean() {
        let closes = wavy(120);
        let rows = enrich(&series_from(&closes));
        for (offset, row) in rows.iter().enumerate() {
            let i = offset + SMA_SLOW_PERIOD - 1;
            let fast = closes[i + 1 - SMA_FAST_PERIOD..=i].iter().sum::<f64>() / 10.0;
            let slow = closes[i + 1 - SMA_SLOW_PERIOD..=i].iter().sum::<f64>() / 50.0;
            assert!((row.sma_10 - fast).abs() < 1e-9);
            assert!((row.sma_50 - slow).abs() < 1e-9);
        }
    }

    #[test]
    fn test_label_invariant() {
        let closes = wavy(150);
        let rows = enrich(&series_from(&closes));
        for (offset, row) in rows.iter().enumerate() {
            let i = offset + SMA_SLOW_PERIOD - 1;
            let expected = u8::from(closes[i + 1] > closes[i]);
            assert_eq!(row.label, expected, "label mismatch at bar {}", i);
        }
    }

    #[test]
    fn test_label_is_zero_on_equal_close() {
        let mut closes = wavy(60);
        closes[55] = closes[54];
        let rows = enrich(&series_from(&closes));
        let row = rows.iter().find(|r| r.bar.close == closes[54]).unwrap();
        assert_eq!(row.label, 0);
    }

    #[test]
    fn test_rsi_bounded() {
        let rows = enrich(&series_from(&wavy(200)));
        assert!(rows.iter().all(|r| (0.0..=100.0).contains(&r.rsi_14)));
    }

    #[test]
    fn test_rsi_saturates_without_losses() {
        let closes: Vec<f64> = (0..70).map(|i| 50.0 + i as f64).collect();
        let rows = enrich(&series_from(&closes));
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|r| r.rsi_14 == 100.0));
        assert!(rows.iter().all(|r| r.label == 1));
    }

    #[test]
    fn test_rsi_zero_without_gains() {
        let closes: Vec<f64> = (0..70).map(|i| 200.0 - i as f64).collect();
        let rows = enrich(&series_from(&closes));
        assert!(rows.iter().all(|r| r.rsi_14 == 0.0));
        assert!(rows.iter().all(|r| r.label == 0));
    }

    #[test]
    fn test_flat_series_has_no_rsi() {
        let rows = enrich(&series_from(&[100.0; 80]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rsi_from_averages() {
        assert_eq!(rsi_from_averages(1.0, 0.0), Some(100.0));
        assert_eq!(rsi_from_averages(0.0, 0.0), None);
        assert_eq!(rsi_from_averages(1.0, 1.0), Some(50.0));
        assert_eq!(rsi_from_averages(0.0, 2.0), Some(0.0));
        let rsi = rsi_from_averages(3.0, 1.0).unwrap();
        assert!((rsi - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_rsi_warmup() {
        let rsi = rolling_rsi(&wavy(20), RSI_PERIOD);
        assert!(rsi[..RSI_PERIOD - 1].iter().all(Option::is_none));
        assert!(rsi[RSI_PERIOD - 1..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rolling_sma_warmup() {
        let sma = rolling_sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert!((sma[2].unwrap() - 2.0).abs() < 1e-12);
        assert!((sma[3].unwrap() - 3.0).abs() < 1e-12);
    }
}
