//! Signed duration grammar used by the duration value kind.
//!
//! Accepted input is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit, optionally preceded by a sign: `300ms`,
//! `-1.5h`, `2h45m`. The bare literal `0` is also accepted. Values must fit
//! in a signed 64-bit count of nanoseconds.
//!
//! Rendering produces the canonical form that parses back to the same value:
//! `1h2m3.5s`, `1.5ms`, `0s`.

use chrono::Duration;

use crate::error::ValueError;

/// Syntax description shown in errors and in usage hints.
pub const DURATION_SYNTAX: &str = "formats: '1h2s', '-3.4ms', units: h, m, s, ms, us, ns";

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const POSITIVE_LIMIT: u128 = i64::MAX as u128;
const NEGATIVE_LIMIT: u128 = POSITIVE_LIMIT + 1;

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    };
    Some(nanos)
}

/// Parses a duration string such as `1h2s` or `-3.4ms`.
pub fn parse_duration(input: &str) -> Result<Duration, ValueError> {
    let invalid = || ValueError::new(input, format!("a duration ({DURATION_SYNTAX})"));

    let (negative, mut rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let limit = if negative {
        NEGATIVE_LIMIT
    } else {
        POSITIVE_LIMIT
    };
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);
        rest = after_int;

        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_digits = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let scale = unit_nanos(unit).ok_or_else(invalid)?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid())?
        };
        let mut component = whole.checked_mul(scale).ok_or_else(invalid)?;

        if !frac_digits.is_empty() {
            // Digits past nanosecond precision of an hour cannot change the result.
            let kept = &frac_digits[..frac_digits.len().min(18)];
            let frac: u128 = kept.parse().map_err(|_| invalid())?;
            component += frac * scale / 10u128.pow(kept.len() as u32);
        }

        total = total.checked_add(component).ok_or_else(invalid)?;
        if total > limit {
            return Err(invalid());
        }
    }

    let signed = if negative {
        -(total as i128)
    } else {
        total as i128
    };
    Ok(Duration::nanoseconds(signed as i64))
}

/// Renders a duration in the form accepted by [`parse_duration`].
pub fn format_duration(duration: &Duration) -> String {
    let nanos: i128 = match duration.num_nanoseconds() {
        Some(n) => n as i128,
        None => duration.num_milliseconds() as i128 * 1_000_000,
    };
    let magnitude = nanos.unsigned_abs();

    let body = if magnitude == 0 {
        return "0s".to_string();
    } else if magnitude < NANOS_PER_SECOND {
        let (scale, unit) = if magnitude < 1_000 {
            (1, "ns")
        } else if magnitude < 1_000_000 {
            (1_000, "µs")
        } else {
            (1_000_000, "ms")
        };
        format!("{}{}", decimal(magnitude, scale), unit)
    } else {
        let seconds = magnitude / NANOS_PER_SECOND;
        let hours = seconds / 3_600;
        let minutes = (seconds / 60) % 60;
        let rem = (seconds % 60) * NANOS_PER_SECOND + magnitude % NANOS_PER_SECOND;

        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("{hours}h{minutes}m"));
        } else if minutes > 0 {
            out.push_str(&format!("{minutes}m"));
        }
        out.push_str(&decimal(rem, NANOS_PER_SECOND));
        out.push('s');
        out
    };

    if nanos < 0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Formats `value / scale` with the fraction's trailing zeros trimmed.
fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
