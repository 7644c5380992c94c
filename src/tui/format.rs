//! Display formatting for prices, volumes, and sparklines.
//!
//! The store hands out raw decimals; everything here is presentation only.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Formats `value` with exactly `digits` decimals and `,` thousands
/// separators, e.g. `67,712.0100`.
pub fn format_price(value: Decimal, digits: u32) -> String {
    let rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.*}", digits as usize, rounded.abs());

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }

    out
}

/// Formats a signed percentage, e.g. `+0.76%` or `-1.20%`.
pub fn format_change(pct: Decimal) -> String {
    let sign = if pct >= Decimal::ZERO { "+" } else { "" };
    format!("{sign}{}%", format_price(pct, 2))
}

/// Compacts large values with a K/M/B suffix, e.g. `21.53K`.
pub fn format_compact(value: Decimal) -> String {
    let thousand = Decimal::from(1_000);
    let million = Decimal::from(1_000_000);
    let billion = Decimal::from(1_000_000_000);
    let abs = value.abs();

    if abs >= billion {
        format!("{}B", two_places(value / billion))
    } else if abs >= million {
        format!("{}M", two_places(value / million))
    } else if abs >= thousand {
        format!("{}K", two_places(value / thousand))
    } else {
        two_places(value)
    }
}

fn two_places(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Symbol prefix for a home currency code.
pub fn currency_prefix(code: &str) -> &str {
    match code {
        "BRL" => "R$",
        "USD" => "$",
        "EUR" => "€",
        "TRY" => "₺",
        other => other,
    }
}

/// Renders the last `width` samples as block characters scaled between
/// their min and max. Fewer than two samples render as blank.
pub fn sparkline(samples: impl IntoIterator<Item = Decimal>, width: usize) -> String {
    let samples: Vec<Decimal> = samples.into_iter().collect();
    if samples.len() < 2 || width == 0 {
        return " ".repeat(width);
    }

    let window = &samples[samples.len().saturating_sub(width)..];
    let min = window.iter().copied().min().unwrap_or(Decimal::ZERO);
    let max = window.iter().copied().max().unwrap_or(Decimal::ZERO);
    let range = if max > min { max - min } else { Decimal::ONE };
    let top = Decimal::from(SPARK_LEVELS.len() - 1);

    window
        .iter()
        .map(|v| {
            let level = ((*v - min) / range * top)
                .round()
                .to_usize()
                .unwrap_or(0)
                .min(SPARK_LEVELS.len() - 1);
            SPARK_LEVELS[level]
        })
        .collect()
}
