use std::collections::HashMap;

use chrono::{Datelike, DateTime, Days, NaiveDate, NaiveDateTime, TimeZone};
use thiserror::Error;

use crate::models::HabitEntry;

/// Wire format for every calendar day.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive timestamp layouts accepted in place of a plain date.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("no complete week around {0}")]
    OutOfRange(NaiveDate),
}

/// Parse a client-supplied day into a calendar date.
///
/// `YYYY-MM-DD` is taken as-is. Finer-grained input is truncated to the civil
/// day in `tz`: RFC 3339 timestamps are converted into `tz` first, naive
/// timestamps are assumed to already be in `tz`.
pub fn parse_calendar_day<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<NaiveDate, CalendarError> {
    let input = input.trim();
    let invalid = || CalendarError::InvalidDate(input.to_string());

    // chrono's %Y also takes signs and 5+ digit years
    if !has_canonical_date_prefix(input) {
        return Err(invalid());
    }

    if input.len() == 10 {
        return NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid());
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(tz).date_naive());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|ts| ts.date())
        .ok_or_else(invalid)
}

/// Whether `input` starts with exactly `DDDD-DD-DD`.
fn has_canonical_date_prefix(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Count the unbroken run of completed days ending at `as_of`, walking backward.
///
/// A day with no entry breaks the run exactly like a day with `completed = false`.
/// If the list holds several entries for one day, the first one wins.
pub fn streak(entries: &[HabitEntry], as_of: NaiveDate) -> u32 {
    let mut by_day: HashMap<NaiveDate, bool> = HashMap::with_capacity(entries.len());
    for entry in entries {
        by_day.entry(entry.date).or_insert(entry.completed);
    }

    let mut count = 0;
    let mut day = Some(as_of);
    while let Some(current) = day {
        if by_day.get(&current) != Some(&true) {
            break;
        }
        count += 1;
        day = current.pred_opt();
    }

    count
}

/// The Monday-through-Sunday week containing `anchor`.
///
/// `None` when that week runs past either end of the representable calendar.
pub fn week_dates(anchor: NaiveDate) -> Option<[NaiveDate; 7]> {
    let back = u64::from(anchor.weekday().num_days_from_monday());
    let monday = anchor.checked_sub_days(Days::new(back))?;

    let mut week = [monday; 7];
    for (offset, slot) in week.iter_mut().enumerate().skip(1) {
        *slot = monday.checked_add_days(Days::new(offset as u64))?;
    }
    Some(week)
}
