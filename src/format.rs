//! Locale-aware number formatting for table cells, tooltips and axis labels.

use serde::{Deserialize, Serialize};

/// Named formatting style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    /// Currency with two decimals, e.g. `$1,234.56`.
    Currency,
    /// Fraction rendered as a percentage with two decimals, e.g. `0.1234` → `12.34%`.
    Percent,
    /// Short-scale abbreviation, e.g. `1.2K`, `3.4M`.
    Compact,
    /// Grouped number with up to three fraction digits.
    #[default]
    Default,
}

impl NumberStyle {
    /// Parse a style name. Unrecognized names fall back to [`NumberStyle::Default`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "currency" => Self::Currency,
            "percent" => Self::Percent,
            "compact" => Self::Compact,
            _ => Self::Default,
        }
    }
}

/// Separators and symbols used when formatting.
///
/// The default is `en-US` with US dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberLocale {
    /// Thousands separator.
    pub grouping_separator: String,
    /// Decimal point.
    pub decimal_separator: String,
    /// Currency symbol placed before the amount.
    pub currency_symbol: String,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// Format `value` in `style` using the default `en-US` locale.
pub fn format_number(value: f64, style: NumberStyle) -> String {
    format_number_with(value, style, &NumberLocale::default())
}

/// Format `value` in `style` using `locale`.
pub fn format_number_with(value: f64, style: NumberStyle, locale: &NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return match style {
            NumberStyle::Currency => format!("{sign}{}∞", locale.currency_symbol),
            NumberStyle::Percent => format!("{sign}∞%"),
            _ => format!("{sign}∞"),
        };
    }

    match style {
        NumberStyle::Currency => {
            let body = decimal(value.abs(), 2, 2, locale);
            with_sign(value, &format!("{}{body}", locale.currency_symbol))
        }
        NumberStyle::Percent => {
            let scaled = value * 100.0;
            with_sign(scaled, &format!("{}%", decimal(scaled.abs(), 2, 2, locale)))
        }
        NumberStyle::Compact => compact(value, locale),
        NumberStyle::Default => with_sign(value, &decimal(value.abs(), 0, 3, locale)),
    }
}

/// Prefix `-` when `value` is negative and the rendered magnitude is not zero.
fn with_sign(value: f64, body: &str) -> String {
    let all_zero = body.bytes().all(|b| !b.is_ascii_digit() || b == b'0');
    if value < 0.0 && !all_zero {
        format!("-{body}")
    } else {
        body.to_string()
    }
}

/// Round half away from zero to `digits` fraction digits.
fn round_to(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

/// Render a non-negative magnitude with grouping and between `min_frac` and `max_frac` fraction
/// digits.
fn decimal(magnitude: f64, min_frac: usize, max_frac: usize, locale: &NumberLocale) -> String {
    let rounded = round_to(magnitude, max_frac);
    let text = format!("{rounded:.max_frac$}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }

    let grouped = group_digits(int_part, &locale.grouping_separator);
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}{}{frac}", locale.decimal_separator)
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

const COMPACT_SUFFIXES: &[(f64, &str)] = &[(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Short-scale compact notation.
///
/// The scaled value keeps its integer digits and is otherwise rounded to two significant
/// digits; rounding up to `1000` promotes to the next suffix.
fn compact(value: f64, locale: &NumberLocale) -> String {
    let magnitude = value.abs();

    let mut tier = COMPACT_SUFFIXES.iter().position(|(threshold, _)| magnitude >= *threshold);
    loop {
        let (divisor, suffix) = match tier {
            Some(i) => COMPACT_SUFFIXES[i],
            None => (1.0, ""),
        };
        let (scaled, frac_digits) = compact_round(magnitude / divisor);
        // 999_999 rounds to "1000K"; promote to "1M".
        let promote = match tier {
            Some(0) => None,
            Some(i) => Some(i - 1),
            None => Some(COMPACT_SUFFIXES.len() - 1),
        };
        if scaled >= 1000.0 {
            if let Some(next) = promote {
                tier = Some(next);
                continue;
            }
        }
        // Compact bodies are never grouped: 1e15 is "1000T", not "1,000T".
        let ungrouped = NumberLocale {
            grouping_separator: String::new(),
            ..locale.clone()
        };
        let body = format!("{}{suffix}", decimal(scaled, 0, frac_digits, &ungrouped));
        return with_sign(value, &body);
    }
}

/// Returns the rounded value and the fraction digits it was rounded to.
fn compact_round(scaled: f64) -> (f64, usize) {
    if scaled == 0.0 {
        return (0.0, 0);
    }
    // Leading digit position: 1 for [1, 10), 0 for [0.1, 1), -1 for [0.01, 0.1).
    let lead = scaled.log10().floor() as i32 + 1;
    // Two significant digits unless there are already more integer digits.
    let frac_digits = (2 - lead).max(0) as usize;
    (round_to(scaled, frac_digits), frac_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1234.56, "$1,234.56")]
    #[case(0.5, "$0.50")]
    #[case(-1234.5, "-$1,234.50")]
    #[case(1_000_000.0, "$1,000,000.00")]
    #[case(-0.001, "$0.00")]
    fn currency(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value, NumberStyle::Currency), expected);
    }

    #[rstest]
    #[case(0.1234, "12.34%")]
    #[case(0.5, "50.00%")]
    #[case(0.125, "12.50%")]
    #[case(12.3456, "1,234.56%")]
    #[case(-0.25, "-25.00%")]
    fn percent(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value, NumberStyle::Percent), expected);
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(999.0, "999")]
    #[case(1000.0, "1K")]
    #[case(1234.0, "1.2K")]
    #[case(12_345.0, "12K")]
    #[case(123_456.0, "123K")]
    #[case(999_999.0, "1M")]
    #[case(1_500_000.0, "1.5M")]
    #[case(2_500_000_000.0, "2.5B")]
    #[case(1e15, "1000T")]
    #[case(2.5e16, "25000T")]
    #[case(-1234.0, "-1.2K")]
    #[case(1.234, "1.2")]
    #[case(0.1234, "0.12")]
    #[case(0.01234, "0.012")]
    fn compact_notation(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value, NumberStyle::Compact), expected);
    }

    #[rstest]
    #[case(1234.5678, "1,234.568")]
    #[case(1234.0, "1,234")]
    #[case(-42.1, "-42.1")]
    #[case(0.0, "0")]
    fn default_style(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value, NumberStyle::Default), expected);
    }

    #[test]
    fn unknown_style_names_fall_back_to_default() {
        assert_eq!(NumberStyle::from_name("bogus"), NumberStyle::Default);
        assert_eq!(NumberStyle::from_name("percent"), NumberStyle::Percent);
    }

    #[test]
    fn custom_locale_separators() {
        let de = NumberLocale {
            grouping_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            currency_symbol: "€".to_string(),
        };
        assert_eq!(format_number_with(1234.5, NumberStyle::Currency, &de), "€1.234,50");
        assert_eq!(format_number_with(1234.5, NumberStyle::Default, &de), "1.234,5");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_number(f64::NAN, NumberStyle::Currency), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY, NumberStyle::Default), "-∞");
    }
}
