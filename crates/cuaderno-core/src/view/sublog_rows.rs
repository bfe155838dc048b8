//! Compact single-line rows for the editable sub-logs.

use crate::entry::{ActivityRecord, InterviewRecord, SubLog};

use super::{sanitize, truncate_chars};

/// Placeholder shown when the activity log has no rows yet.
pub const EMPTY_ACTIVITY_LOG_TEXT: &str = "No hay actividades registradas.";

/// Placeholder shown when the interview log has no rows yet.
pub const EMPTY_INTERVIEW_LOG_TEXT: &str = "No hay interacciones registradas.";

/// Free-text portion of a row is clipped to keep rows one line tall.
const ROW_TEXT_MAX_CHARS: usize = 60;

/// One visible sub-log row. The index doubles as the removal key the
/// frontend hands back to [`SubLog::remove_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubLogRow {
    pub index: usize,
    pub text: String,
}

/// Derives the visible rows of the activity log: time, category and a
/// truncated description per record.
pub fn activity_rows(log: &SubLog<ActivityRecord>) -> Vec<SubLogRow> {
    log.records()
        .iter()
        .enumerate()
        .map(|(index, record)| SubLogRow {
            index,
            text: format!(
                "{}  {}  {}",
                sanitize(&record.time),
                sanitize(&record.kind),
                truncate_chars(&sanitize(&record.description), ROW_TEXT_MAX_CHARS),
            ),
        })
        .collect()
}

/// Derives the visible rows of the interview log: time, kind, role, quoted
/// excerpt and the pipe-joined informant profile. Formal interviews quote
/// with guillemets, informal ones with plain quotes.
pub fn interview_rows(log: &SubLog<InterviewRecord>) -> Vec<SubLogRow> {
    log.records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let profile = record.profile();
            let quote = truncate_chars(&sanitize(&record.quote), ROW_TEXT_MAX_CHARS);
            let quote = if record.is_formal() {
                format!("«{}»", quote)
            } else {
                format!("\"{}\"", quote)
            };
            let mut text = format!(
                "{}  {}  {}  {}",
                sanitize(&record.time),
                sanitize(&record.kind),
                sanitize(&record.role),
                quote,
            );
            if !profile.is_empty() {
                text.push_str(&format!("  ({})", sanitize(&profile)));
            }
            SubLogRow { index, text }
        })
        .collect()
}
