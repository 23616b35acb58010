//! Lightweight cron expression parser.
//! Supports: "MIN HOUR DOM MON DOW" (5-field, no seconds)
//! Wildcards: *, */N, N, and comma lists for minute and hour.
//! Example: "0 2 * * *" = every day at 02:00 local time
//!
//! Day-of-month, month and day-of-week must be `*`.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Parse a simple cron expression and compute the next run time after `after`.
pub fn next_run_from_cron(expression: &str, after: NaiveDateTime) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != 5 {
        tracing::warn!(
            "Invalid cron expression: '{}' (need 5 fields: MIN HOUR DOM MON DOW)",
            expression
        );
        return None;
    }
    if parts[2..].iter().any(|p| *p != "*") {
        tracing::warn!(
            "Unsupported cron expression: '{}' (DOM, MON and DOW must be '*')",
            expression
        );
        return None;
    }

    let minutes = parse_field(parts[0], 0, 59)?;
    let hours = parse_field(parts[1], 0, 23)?;
    if minutes.is_empty() || hours.is_empty() {
        return None;
    }

    let mut candidate = after + Duration::minutes(1);
    candidate = candidate
        .with_second(0)
        .and_then(|c| c.with_nanosecond(0))
        .unwrap_or(candidate);

    // Every valid minute/hour pair recurs within a day.
    for _ in 0..(48 * 60) {
        if minutes.contains(&candidate.minute()) && hours.contains(&candidate.hour()) {
            return Some(candidate);
        }
        candidate += Duration::minutes(1);
    }

    None
}

/// Values in `min..=max` matched by one cron field. Any entry outside the
/// range (including inside a comma list) makes the whole field invalid.
fn parse_field(field: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    let in_range = |n: u32| (min..=max).contains(&n).then_some(n);

    match field {
        "*" => Some((min..=max).collect()),
        _ if field.starts_with("*/") => {
            let step: usize = field[2..].parse().ok().filter(|n| *n > 0)?;
            Some((min..=max).step_by(step).collect())
        }
        _ => {
            let mut values = field
                .split(',')
                .map(|part| part.trim().parse().ok().and_then(in_range))
                .collect::<Option<Vec<u32>>>()?;
            values.sort_unstable();
            values.dedup();
            Some(values)
        }
    }
}
