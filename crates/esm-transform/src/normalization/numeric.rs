//! Numeric coercion.

use super::categorical::is_missing_token;

/// Leading currency symbols tolerated on decimal values.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// 2^53.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Outcome of coercing one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    /// Empty or a missing-value token.
    Missing,
    /// Present but not coercible.
    Malformed,
    Value(T),
}

impl<T> Coerced<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Coerced::Value(value) => Some(value),
            Coerced::Missing | Coerced::Malformed => None,
        }
    }
}

/// Parse a decimal, tolerating thousands separators and a leading currency
/// symbol. Non-finite values are malformed.
pub fn parse_decimal(raw: &str) -> Coerced<f64> {
    if is_missing_token(raw) {
        return Coerced::Missing;
    }
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = unsigned
        .trim_start_matches(CURRENCY_SYMBOLS)
        .trim_start()
        .chars()
        .filter(|ch| *ch != ',')
        .collect();

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() && !digits.starts_with(['-', '+']) => {
            Coerced::Value(if negative { -value } else { value })
        }
        _ => Coerced::Malformed,
    }
}

/// Parse a whole count. Integral decimals such as `3.0` are accepted.
pub fn parse_count(raw: &str) -> Coerced<i64> {
    match parse_decimal(raw) {
        // Integral and within the exactly representable range.
        Coerced::Value(value) if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER => {
            Coerced::Value(value as i64)
        }
        Coerced::Value(_) | Coerced::Malformed => Coerced::Malformed,
        Coerced::Missing => Coerced::Missing,
    }
}

/// Parse a boolean flag (`1`/`0`, `true`/`false`, `yes`/`no`, `y`/`n`).
pub fn parse_flag(raw: &str) -> Coerced<bool> {
    if is_missing_token(raw) {
        return Coerced::Missing;
    }
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Coerced::Value(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Coerced::Value(false),
        _ => Coerced::Malformed,
    }
}
