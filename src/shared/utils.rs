//! Utility functions and helpers

use std::time::Duration;

use crate::shared::errors::AppError;

/// Format an order volume the way the exchange expects it (six decimals)
pub fn format_volume(volume: f64) -> String {
    format!("{:.6}", volume)
}

/// Parse a duration such as `24h`, `1h30m`, `90s`, `500ms` or `7d`.
/// Fractional values are accepted (`1.5h`).
pub fn parse_duration(input: &str) -> Result<Duration, AppError> {
    let invalid = || AppError::InvalidDuration(input.to_string());
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let seconds_per_unit = match &rest[..unit_len] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "d" => 86_400.0,
            "w" => 604_800.0,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];
        total += value * seconds_per_unit;
    }

    Duration::try_from_secs_f64(total).map_err(|_| invalid())
}

/// Replace `${VAR}` and `$VAR` references using `lookup`.
/// Unknown variables expand to an empty string.
pub fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some(&(_, '{')) => {
                let start = i + 2;
                match input[start..].find('}') {
                    Some(len) => {
                        let name = &input[start..start + len];
                        out.push_str(&lookup(name).unwrap_or_default());
                        // skip the name and the closing brace
                        while let Some(&(j, _)) = chars.peek() {
                            if j > start + len {
                                break;
                            }
                            chars.next();
                        }
                    }
                    None => out.push(c),
                }
            }
            Some(&(_, n)) if n.is_ascii_alphabetic() || n == '_' => {
                let start = i + 1;
                let mut end = start;
                while let Some(&(j, n)) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        end = j + n.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&lookup(&input[start..end]).unwrap_or_default());
            }
            _ => out.push(c),
        }
    }

    out
}

/// Expand environment variable references from the process environment
pub fn expand_env(input: &str) -> String {
    expand_env_with(input, |name| std::env::var(name).ok())
}

/// Escape text for inclusion in an HTML document
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
