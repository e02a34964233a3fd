use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::{DialogError, DialogResult};

/// Map a relative date reference to an absolute calendar date against a
/// fixed reference "now". Pure; never guesses. Unknown tokens fail with
/// `DialogError::UnresolvedDate`.
pub fn resolve_relative(token: &str, reference: NaiveDate) -> DialogResult<NaiveDate> {
    let normalized = token.trim().to_lowercase();

    match normalized.as_str() {
        "today" | "tonight" => return Ok(reference),
        "tomorrow" => return Ok(reference + Duration::days(1)),
        "day after tomorrow" | "the day after tomorrow" => {
            return Ok(reference + Duration::days(2))
        }
        _ => {}
    }

    // "in N days". Negative or out-of-calendar-range counts are
    // unresolvable, not a panic.
    if let Some(rest) = normalized.strip_prefix("in ") {
        let count = rest
            .strip_suffix(" days")
            .or_else(|| rest.strip_suffix(" day"));
        if let Some(count) = count {
            if let Ok(n) = count.trim().parse::<i64>() {
                return Duration::try_days(n)
                    .filter(|_| n >= 0)
                    .and_then(|days| reference.checked_add_signed(days))
                    .ok_or_else(|| DialogError::UnresolvedDate {
                        token: token.to_string(),
                    });
            }
        }
    }

    // "next friday" or a bare weekday name; both mean the next occurrence
    // strictly after the reference day.
    let weekday_token = normalized.strip_prefix("next ").unwrap_or(&normalized);
    if let Some(weekday) = parse_weekday(weekday_token) {
        return Ok(next_occurrence(reference, weekday));
    }

    // Explicit ISO date passthrough
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return Ok(date);
    }

    Err(DialogError::UnresolvedDate {
        token: token.to_string(),
    })
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn next_occurrence(reference: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() + 7
        - reference.weekday().num_days_from_monday())
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    reference + Duration::days(ahead as i64)
}
