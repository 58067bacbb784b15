use rand::Rng;
use rand::seq::IndexedRandom;

/// Keyword → glyph table, scanned in order. The first keyword contained
/// in the lower-cased habit name wins.
const KEYWORD_EMOJIS: &[(&str, &str)] = &[
    ("workout", "🏋️"),
    ("exercise", "🏋️"),
    ("gym", "🏋️"),
    ("yoga", "🧘"),
    ("meditate", "🧘"),
    ("meditation", "🧘"),
    ("water", "💧"),
    ("drink", "💧"),
    ("hydrate", "💧"),
    ("journal", "📝"),
    ("write", "📝"),
    ("diary", "📝"),
    ("walk", "🚶"),
    ("dog", "🐕"),
    ("plant", "🌱"),
    ("garden", "🌱"),
    ("skincare", "🧴"),
    ("skin", "🧴"),
    ("read", "📚"),
    ("book", "📚"),
    ("sleep", "💤"),
    ("rest", "💤"),
];

/// Fallback set when no keyword matches.
pub const DEFAULT_EMOJIS: &[&str] = &["📝", "🏋️", "🧘", "💧", "🐕", "🌱", "🧴", "📚", "💤"];

/// Guess a display glyph for a habit name. Always returns a non-empty glyph.
pub fn suggest_emoji(name: &str) -> &'static str {
    suggest_emoji_with(name, &mut rand::rng())
}

pub fn suggest_emoji_with<R: Rng + ?Sized>(name: &str, rng: &mut R) -> &'static str {
    let lowered = name.to_lowercase();

    KEYWORD_EMOJIS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, emoji)| *emoji)
        .or_else(|| DEFAULT_EMOJIS.choose(rng).copied())
        .unwrap_or(DEFAULT_EMOJIS[0])
}
