use chrono::NaiveDate;
use tracing::info;

use habitgrid_db::Database;
use habitgrid_types::calendar;
use habitgrid_types::models::{Habit, HabitEntry, HabitWithEntries};

use crate::error::HabitError;

/// Habit lifecycle and per-day toggling on top of the store.
///
/// All methods block on SQLite; async callers run them on
/// `tokio::task::spawn_blocking`.
pub struct HabitService {
    db: Database,
}

impl HabitService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, name: &str, emoji: &str) -> Result<Habit, HabitError> {
        let name = validate_name(name)?;

        let habit = self.db.insert_habit(name, emoji)?.into_habit()?;
        info!("Created habit {} ({})", habit.id, habit.name);
        Ok(habit)
    }

    pub fn list(&self) -> Result<Vec<HabitWithEntries>, HabitError> {
        self.db
            .habits_with_entries()?
            .into_iter()
            .map(|(habit, entries)| -> Result<HabitWithEntries, HabitError> {
                Ok(HabitWithEntries {
                    habit: habit.into_habit()?,
                    entries: entries
                        .into_iter()
                        .map(|row| row.into_entry())
                        .collect::<anyhow::Result<Vec<_>>>()?,
                })
            })
            .collect()
    }

    /// Only the name can change; `id`, `emoji` and `created_at` are fixed.
    pub fn rename(&self, id: i64, name: &str) -> Result<Habit, HabitError> {
        let name = validate_name(name)?;

        let habit = self
            .db
            .rename_habit(id, name)?
            .ok_or(HabitError::NotFound(id))?
            .into_habit()?;
        info!("Renamed habit {} to {}", habit.id, habit.name);
        Ok(habit)
    }

    /// Removes the habit and its entries. Unknown ids are not an error.
    pub fn delete(&self, id: i64) -> Result<(), HabitError> {
        if self.db.delete_habit(id)? {
            info!("Deleted habit {}", id);
        }
        Ok(())
    }

    /// Create the day's entry as completed, or flip it if it already exists.
    /// Returns the entry as stored after the mutation.
    pub fn toggle(&self, habit_id: i64, date: NaiveDate) -> Result<HabitEntry, HabitError> {
        let entry = self
            .db
            .toggle_entry(habit_id, date)?
            .ok_or(HabitError::NotFound(habit_id))?
            .into_entry()?;
        Ok(entry)
    }

    pub fn streak(&self, habit_id: i64, as_of: NaiveDate) -> Result<u32, HabitError> {
        if self.db.get_habit(habit_id)?.is_none() {
            return Err(HabitError::NotFound(habit_id));
        }

        let entries = self
            .db
            .entries_for_habit(habit_id)?
            .into_iter()
            .map(|row| row.into_entry())
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(calendar::streak(&entries, as_of))
    }
}

fn validate_name(name: &str) -> Result<&str, HabitError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HabitError::InvalidArgument("habit name must not be empty".into()));
    }
    Ok(trimmed)
}
