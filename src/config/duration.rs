// src/config/duration.rs

use std::time::Duration;

/// Parse a duration such as `"3s"`, `"250ms"`, `"2h"` or `"1m30s"`.
///
/// A duration is one or more `<digits><unit>` groups with units `ms`, `s`,
/// `m` and `h`. Used for the project `timeout` and the `--timeout` flag;
/// `"0s"` means no limit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;
        if digits == 0 {
            return Err(format!("invalid duration '{s}': expected a number"));
        }
        let (num_part, tail) = rest.split_at(digits);
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let part = match unit.to_lowercase().as_str() {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            other => {
                return Err(format!(
                    "unsupported duration unit '{other}'; expected ms, s, m, or h"
                ));
            }
        };
        total = total.saturating_add(part);
        rest = next;
    }

    Ok(total)
}
