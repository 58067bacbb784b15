use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined activity tracked once per calendar day.
/// `id` and `emoji` never change after creation; only `name` can be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

/// Completion record for one habit on one calendar day.
/// At most one exists per `(habit_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    pub id: i64,
    pub habit_id: i64,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub completed: bool,
}

/// List view of a habit with all of its entries attached (unordered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitWithEntries {
    #[serde(flatten)]
    pub habit: Habit,
    pub entries: Vec<HabitEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn habit_serializes_camel_case() {
        let habit = Habit {
            id: 7,
            name: "Read".into(),
            emoji: "📚".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["createdAt"], "2024-03-01T09:30:00Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn list_view_flattens_habit_fields() {
        let with_entries = HabitWithEntries {
            habit: Habit {
                id: 1,
                name: "Walk".into(),
                emoji: "🚶".into(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            },
            entries: vec![HabitEntry {
                id: 3,
                habit_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                completed: true,
            }],
        };

        let json = serde_json::to_value(&with_entries).unwrap();
        assert_eq!(json["name"], "Walk");
        assert_eq!(json["entries"][0]["habitId"], 1);
        assert_eq!(json["entries"][0]["date"], "2024-03-04");
        assert_eq!(json["entries"][0]["completed"], true);
    }
}
