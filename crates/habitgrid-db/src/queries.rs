use std::collections::HashMap;

use crate::Database;
use crate::models::{EntryRow, HabitRow};
use anyhow::Result;
use chrono::NaiveDate;
use habitgrid_types::calendar::DATE_FORMAT;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

const HABIT_COLUMNS: &str = "id, name, emoji, created_at";
const ENTRY_COLUMNS: &str = "id, habit_id, date, completed";

impl Database {
    // -- Habits --

    pub fn insert_habit(&self, name: &str, emoji: &str) -> Result<HabitRow> {
        self.with_tx(|tx| {
            let row = tx.query_row(
                &format!("INSERT INTO habits (name, emoji) VALUES (?1, ?2) RETURNING {HABIT_COLUMNS}"),
                (name, emoji),
                map_habit,
            )?;
            Ok(row)
        })
    }

    pub fn get_habit(&self, id: i64) -> Result<Option<HabitRow>> {
        self.with_conn(|conn| query_habit(conn, id))
    }

    /// Every habit paired with its entries, read under one lock so the
    /// two halves are consistent with each other.
    pub fn habits_with_entries(&self) -> Result<Vec<(HabitRow, Vec<EntryRow>)>> {
        self.with_conn(|conn| {
            let habits = query_habits(conn)?;
            let entries = query_entries(conn, None)?;

            let mut by_habit: HashMap<i64, Vec<EntryRow>> = HashMap::new();
            for entry in entries {
                by_habit.entry(entry.habit_id).or_default().push(entry);
            }

            Ok(habits
                .into_iter()
                .map(|habit| {
                    let entries = by_habit.remove(&habit.id).unwrap_or_default();
                    (habit, entries)
                })
                .collect())
        })
    }

    /// Returns `None` if the habit does not exist.
    pub fn rename_habit(&self, id: i64, name: &str) -> Result<Option<HabitRow>> {
        self.with_tx(|tx| {
            let row = tx
                .query_row(
                    &format!("UPDATE habits SET name = ?1 WHERE id = ?2 RETURNING {HABIT_COLUMNS}"),
                    rusqlite::params![name, id],
                    map_habit,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Delete a habit and all of its entries in one transaction.
    /// Returns whether the habit existed.
    pub fn delete_habit(&self, id: i64) -> Result<bool> {
        self.with_tx(|tx| {
            let entries = tx.execute("DELETE FROM habit_entries WHERE habit_id = ?1", [id])?;
            let habits = tx.execute("DELETE FROM habits WHERE id = ?1", [id])?;
            debug!("Deleted habit {} ({} rows, {} entries)", id, habits, entries);
            Ok(habits > 0)
        })
    }

    // -- Entries --

    #[cfg(test)]
    pub(crate) fn list_entries(&self) -> Result<Vec<EntryRow>> {
        self.with_conn(|conn| query_entries(conn, None))
    }

    pub fn entries_for_habit(&self, habit_id: i64) -> Result<Vec<EntryRow>> {
        self.with_conn(|conn| query_entries(conn, Some(habit_id)))
    }

    /// Toggle the entry for `(habit_id, date)`: creates it as completed if absent,
    /// flips `completed` otherwise. A single upsert keeps this atomic per key.
    /// Returns `None` if the habit does not exist.
    pub fn toggle_entry(&self, habit_id: i64, date: NaiveDate) -> Result<Option<EntryRow>> {
        let day = date.format(DATE_FORMAT).to_string();

        self.with_tx(|tx| {
            if query_habit(tx, habit_id)?.is_none() {
                return Ok(None);
            }

            let row = tx.query_row(
                &format!(
                    "INSERT INTO habit_entries (habit_id, date, completed) VALUES (?1, ?2, 1)
                     ON CONFLICT(habit_id, date) DO UPDATE SET completed = NOT completed
                     RETURNING {ENTRY_COLUMNS}"
                ),
                rusqlite::params![habit_id, day],
                map_entry,
            )?;

            Ok(Some(row))
        })
    }
}

fn query_habit(conn: &Connection, id: i64) -> Result<Option<HabitRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
            [id],
            map_habit,
        )
        .optional()?;

    Ok(row)
}

fn query_habits(conn: &Connection) -> Result<Vec<HabitRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {HABIT_COLUMNS} FROM habits ORDER BY id"))?;

    let rows = stmt
        .query_map([], map_habit)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_entries(conn: &Connection, habit_id: Option<i64>) -> Result<Vec<EntryRow>> {
    let filter = if habit_id.is_some() { "WHERE habit_id = ?1" } else { "" };
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM habit_entries {filter} ORDER BY habit_id, date"
    ))?;

    let params: Vec<i64> = habit_id.into_iter().collect();
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), map_entry)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_habit(row: &Row<'_>) -> rusqlite::Result<HabitRow> {
    Ok(HabitRow {
        id: row.get(0)?,
        name: row.get(1)?,
        emoji: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: row.get(2)?,
        completed: row.get(3)?,
    })
}
