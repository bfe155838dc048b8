//! Pure view-model derivation: filtering and display summaries.
//!
//! Nothing in this module touches a terminal or performs I/O; deriving a
//! view twice from the same input produces the same output. The frontend
//! only prints what is produced here.

mod card;
mod filter;
mod sublog_rows;

pub use card::{EntryCard, NO_SUMMARY_TEXT, SUMMARY_MAX_CHARS};
pub use filter::filter_entries;
pub use sublog_rows::{
    activity_rows, interview_rows, SubLogRow, EMPTY_ACTIVITY_LOG_TEXT, EMPTY_INTERVIEW_LOG_TEXT,
};

/// Strips control characters from user-supplied text before it is placed in
/// any rendered output. User content must never be able to smuggle escape
/// sequences into the display medium.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Collapses all whitespace runs (including newlines) to single spaces and
/// trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters, appending `...` when
/// anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}
