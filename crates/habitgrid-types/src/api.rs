use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// -- Habits --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateHabitRequest {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameHabitRequest {
    pub name: String,
}

// -- Entries --

/// `date` stays a string here so that timestamps can be truncated
/// to the server's civil day instead of being rejected by serde.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleEntryRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakQuery {
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub habit_id: i64,
    pub as_of: NaiveDate,
    pub streak: u32,
}

// -- Calendar --

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub anchor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekResponse {
    pub anchor: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

// -- Emoji --

#[derive(Debug, Deserialize)]
pub struct EmojiQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmojiSuggestion {
    pub name: String,
    pub emoji: String,
}

// -- Errors --

/// Fixed-shape body for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
