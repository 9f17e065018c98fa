//! Simple Moving Average.
//!
//! O(n) sliding window over closing prices.
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) values are `None`.

use rust_decimal::Decimal;

pub fn calculate_sma(closes: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let divisor = Decimal::from(period as u64);
    let mut values = Vec::with_capacity(closes.len());
    let mut window_sum = Decimal::ZERO;

    for (i, &close) in closes.iter().enumerate() {
        window_sum += close;
        if i >= period {
            window_sum -= closes[i - period];
        }

        if i + 1 >= period {
            values.push(Some(window_sum / divisor));
        } else {
            values.push(None);
        }
    }

    values
}
