//! Number formatting to a fixed count of significant figures
//!
//! Numbers are written in plain decimal notation (never exponent form),
//! with thousands separated by a thin space. A quantity is the number,
//! a thin space and the unit symbol.

/// Separator used between thousands and between a number and its unit
pub const THIN_SPACE: char = '\u{2009}';

/// Most significant figures a number is ever rendered with
pub const MAX_FIGURES: usize = 21;

/// Count the significant figures in a numeric literal.
///
/// A leading `0.` and the zeros that follow it are not significant;
/// every other digit of the mantissa is, including trailing zeros
/// (`"1500"` has 4, `"0.00120"` has 3).
pub fn significant_figures(literal: &str) -> usize {
    let mantissa = literal
        .trim()
        .split(['e', 'E'])
        .next()
        .unwrap_or_default();

    let significant = match mantissa.strip_prefix("0.") {
        Some(rest) if !rest.is_empty() => {
            let trimmed = rest.trim_start_matches('0');
            if trimmed.is_empty() {
                &rest[rest.len() - 1..]
            } else {
                trimmed
            }
        }
        _ => mantissa,
    };

    significant
        .chars()
        .filter(|c| c.is_ascii_digit())
        .count()
        .max(1)
}

/// Render `value` rounded to `figures` significant figures.
///
/// Trailing zeros are kept, so `format_number(1.0, 3)` is `"1.00"`.
/// An exact tie rounds away from zero (`0.25` to one figure is `"0.3"`).
pub fn format_number(value: f64, figures: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let figures = figures.clamp(1, MAX_FIGURES);
    let (digits, exponent) = round_significant(value.abs(), figures);

    let (integer, fraction) = if exponent < 0 {
        let leading = "0".repeat((-exponent - 1) as usize);
        ("0".to_string(), format!("{leading}{digits}"))
    } else {
        let integer_len = exponent as usize + 1;
        if integer_len >= digits.len() {
            let padding = "0".repeat(integer_len - digits.len());
            (format!("{digits}{padding}"), String::new())
        } else {
            (
                digits[..integer_len].to_string(),
                digits[integer_len..].to_string(),
            )
        }
    };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(&integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Render `value` with exactly `places` decimals, ties away from zero
/// (`12.5` at no places is `"13"`). No thousands grouping.
pub fn format_fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_PLACES, value.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((&exact, ""));
    let mut digits: Vec<u8> = integer.bytes().collect();
    digits.extend(fraction.bytes().take(places));
    if fraction.as_bytes().get(places).is_some_and(|&d| d >= b'5') && increment(&mut digits) {
        digits.insert(0, b'1');
    }

    let split = digits.len() - places;
    let mut out = String::new();
    if value < 0.0 && digits.iter().any(|&d| d != b'0') {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| d as char));
    if places > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&d| d as char));
    }
    out
}

/// Render a quantity with its unit symbol, e.g. `"2 000 m"` (thin spaces)
pub fn format_quantity(value: f64, symbol: &str, figures: usize) -> String {
    format!("{}{THIN_SPACE}{symbol}", format_number(value, figures))
}

/// Digits after the point needed to print any `f64` exactly
const EXACT_PLACES: usize = 1074;

/// Significant digits needed to print any `f64` exactly
const EXACT_FIGURES: usize = 767;

/// The first `figures` significant digits of a non-negative `value`,
/// rounded half up on its exact decimal expansion, with the decimal
/// exponent of the first digit
fn round_significant(value: f64, figures: usize) -> (String, i32) {
    let exact = format!("{:.*e}", EXACT_FIGURES, value);
    let (mantissa, exponent) = exact.split_once('e').unwrap_or((&exact, "0"));
    let mut exponent: i32 = exponent.parse().unwrap_or(0);

    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let mut digits = all[..figures.min(all.len())].to_vec();
    if all.get(figures).is_some_and(|&d| d >= b'5') && increment(&mut digits) {
        // 9.99 -> 10.0: one more integer digit, same count of figures
        digits.insert(0, b'1');
        digits.truncate(figures);
        exponent += 1;
    }
    (digits.into_iter().map(char::from).collect(), exponent)
}

/// Add one to the last of a run of ASCII digits; true when it carries
/// out of the first digit (every digit was 9 and is now 0)
fn increment(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3 * THIN_SPACE.len_utf8());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THIN_SPACE);
        }
        out.push(c);
    }
    out
}
