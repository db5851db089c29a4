//! Display formatting for amounts, dates and scores
//!
//! Numbers are rendered the way a browser would render them for an en-US
//! user: fixed-point output rounds exact midpoints away from zero, and plain
//! numbers print in their shortest form.

use chrono::NaiveDate;

/// Largest magnitude below which every integer is exactly representable
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Magnitudes at or above this print in exponent form
const EXPONENT_UPPER: f64 = 1e21;

/// Magnitudes below this print in exponent form
const EXPONENT_LOWER: f64 = 1e-6;

/// Format a number in its shortest round-trip form ("80", "72.5", "0")
///
/// Very large and very small magnitudes use exponent form ("1e+21", "1.5e-7").
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers negative zero as well
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
            _ => formatted,
        };
    }
    value.to_string()
}

/// Format with exactly `digits` fractional digits
///
/// Ties on the exact binary value round away from zero, so 0.25 becomes
/// "0.3" while 0.35 (stored as 0.34999...) becomes "0.3".
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let magnitude = value.abs();

    // A midpoint at `digits` places is always a multiple of 2^-(digits + 1),
    // and scaling by a power of two is exact.
    let scaled = magnitude * (1u64 << (digits + 1)) as f64;
    let body = if scaled.fract() == 0.0 && scaled < MAX_EXACT_INTEGER && (scaled as u64) % 2 == 1 {
        let units = ((scaled as u128) * 5u128.pow(digits as u32)).div_ceil(2);
        insert_decimal_point(units, digits)
    } else {
        format!("{:.prec$}", magnitude, prec = digits)
    };

    if value < 0.0 { format!("-{}", body) } else { body }
}

/// Render an integer count of 10^-digits units as a decimal string
fn insert_decimal_point(units: u128, digits: usize) -> String {
    let s = format!("{:0>width$}", units, width = digits + 1);
    if digits == 0 {
        return s;
    }
    let (int_part, frac_part) = s.split_at(s.len() - digits);
    format!("{}.{}", int_part, frac_part)
}

/// Insert thousands separators into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Round a plain decimal string to `digits` fractional digits, ties away from zero
///
/// Works on the printed digits, so 1.005 rounds to "1.01" even though its
/// stored value sits just below the midpoint.
fn round_decimal(repr: &str, digits: usize) -> (String, String) {
    let (whole, frac) = repr.split_once('.').unwrap_or((repr, ""));
    let round_up = frac.as_bytes().get(digits).is_some_and(|&d| d >= b'5');

    let mut kept: Vec<u8> = whole.bytes().chain(frac.bytes().take(digits)).collect();
    kept.resize(whole.len() + digits, b'0');

    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let text = String::from_utf8_lossy(&kept);
    (text[..split].to_string(), text[split..].to_string())
}

/// Format an amount as US dollars ("$1,234.50", "-$12.00")
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", format_number(amount));
    }

    // Display for f64 is the shortest round-trip form and never uses an exponent
    let (whole, cents) = round_decimal(&amount.abs().to_string(), 2);
    let sign = if amount < 0.0 { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(&whole), cents)
}

/// Format a date as an en-US short date ("3/7/2025")
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
