//! Database row types: these map directly to SQLite rows.
//! Dates and timestamps stay as stored text until converted.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use habitgrid_types::calendar::DATE_FORMAT;
use habitgrid_types::models::{Habit, HabitEntry};

#[derive(Debug, Clone)]
pub struct HabitRow {
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    pub habit_id: i64,
    pub date: String,
    pub completed: bool,
}

impl HabitRow {
    pub fn into_habit(self) -> Result<Habit> {
        let created_at = parse_timestamp(&self.created_at)
            .with_context(|| format!("corrupt created_at '{}' on habit {}", self.created_at, self.id))?;

        Ok(Habit {
            id: self.id,
            name: self.name,
            emoji: self.emoji,
            created_at,
        })
    }
}

impl EntryRow {
    pub fn into_entry(self) -> Result<HabitEntry> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("corrupt date '{}' on entry {}", self.date, self.id))?;

        Ok(HabitEntry {
            id: self.id,
            habit_id: self.habit_id,
            date,
            completed: self.completed,
        })
    }
}

/// SQLite's `datetime('now')` yields "YYYY-MM-DD HH:MM:SS" without a zone;
/// it is UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")?;
    Ok(naive.and_utc())
}
