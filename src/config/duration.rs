use crate::ConfigError;
use std::time::Duration;

/// Parses a duration string into a [`Duration`]
///
/// Accepts the compact unit notation used throughout the configuration:
/// a sequence of `<number><unit>` segments where the unit is one of
/// `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. Segments accumulate, so
/// `"1h30m"` is ninety minutes. Fractional numbers are accepted
/// (`"2.5s"`). The zero duration must still carry a unit (`"0s"`).
///
/// # Arguments
///
/// * `input` - The duration string, e.g. `"24h"`, `"10ms"`, `"5ns"`
///
/// # Returns
///
/// * `Ok(Duration)` - The parsed duration
/// * `Err(ConfigError)` - The string is empty, has a dangling number, or an
///   unknown unit
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidDuration(
            "duration string is empty".to_string(),
        ));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(ConfigError::InvalidDuration(format!(
                "expected a number in '{}'",
                input
            )));
        }
        let (number, after_number) = rest.split_at(digits_end);
        let value: f64 = number.parse().map_err(|_| {
            ConfigError::InvalidDuration(format!("invalid number '{}' in '{}'", number, input))
        })?;

        let unit_end = after_number
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, after_unit) = after_number.split_at(unit_end);
        let nanos_per_unit: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" => 1_000_000_000.0,
            "m" => 60.0 * 1_000_000_000.0,
            "h" => 3600.0 * 1_000_000_000.0,
            "" => {
                return Err(ConfigError::InvalidDuration(format!(
                    "missing unit after '{}' in '{}'",
                    number, input
                )))
            }
            other => {
                return Err(ConfigError::InvalidDuration(format!(
                    "unknown unit '{}' in '{}'",
                    other, input
                )))
            }
        };

        total += Duration::from_nanos((value * nanos_per_unit) as u64);
        rest = after_unit;
    }

    Ok(total)
}
