//! The in-progress draft entry.
//!
//! The draft (form fields plus the two sub-logs) is the only mutable state
//! in the client. Composing it into an [`EntryPayload`] is pure assembly
//! with no I/O; submission itself lives in the application layer.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::entry::{
    ActivityRecord, EntryPayload, InterviewRecord, StructuredData, SubLog,
    ENTRY_TYPE_STRUCTURED,
};

/// Tone classification selector options. The first option is the reset
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum MoodOption {
    Neutral,
    Festivo,
    Tenso,
    #[strum(serialize = "Melancólico")]
    Melancolico,
}

/// Theme classification selector options. The first option is the reset
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ThemeOption {
    General,
    #[strum(serialize = "Música")]
    Musica,
    Ritual,
    Trabajo,
    Familia,
}

/// First mood option, used when resetting the classification selector.
pub fn default_mood() -> String {
    MoodOption::iter()
        .next()
        .map(|m| m.to_string())
        .unwrap_or_default()
}

/// First theme option, used when resetting the classification selector.
pub fn default_theme() -> String {
    ThemeOption::iter()
        .next()
        .map(|t| t.to_string())
        .unwrap_or_default()
}

/// Raw form field values of the draft, exactly as typed.
///
/// Trimming and tag splitting happen at compose time so no keystroke is
/// second-guessed while the user is still editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftFields {
    pub title: String,
    pub location: String,
    /// `"lat, lon"` as produced by the geolocation capture, or empty
    pub geolocation: String,
    /// Comma-separated tags as typed
    pub tags: String,
    pub mood: String,
    pub theme: String,
    pub context_spatial: String,
    pub context_demography: String,
    pub context_social: String,
    pub etno_repertoire: String,
    pub etno_analysis: String,
    pub etno_function: String,
    pub social_reflection: String,
    pub notes_personal: String,
    pub notes_media: String,
}

/// The in-progress, unsaved entry plus its two sub-logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub fields: DraftFields,
    pub activity_log: SubLog<ActivityRecord>,
    pub interview_log: SubLog<InterviewRecord>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            fields: DraftFields {
                mood: default_mood(),
                theme: default_theme(),
                ..Default::default()
            },
            activity_log: SubLog::new(),
            interview_log: SubLog::new(),
        }
    }
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles the immutable submission payload from the current draft.
    ///
    /// Pure: trims all free-text fields, splits the tags field on commas
    /// (trimmed, empties dropped, order preserved, duplicates kept) and
    /// copies both sub-logs. The draft itself is left untouched.
    pub fn compose(&self) -> EntryPayload {
        let f = &self.fields;
        EntryPayload {
            title: f.title.trim().to_string(),
            location: f.location.trim().to_string(),
            geolocation: f.geolocation.trim().to_string(),
            tags: parse_tags(&f.tags),
            mood: f.mood.clone(),
            theme: f.theme.clone(),
            entry_type: ENTRY_TYPE_STRUCTURED.to_string(),
            data: StructuredData {
                context_spatial: f.context_spatial.trim().to_string(),
                context_demography: f.context_demography.trim().to_string(),
                context_social: f.context_social.trim().to_string(),
                etno_repertoire: f.etno_repertoire.trim().to_string(),
                etno_analysis: f.etno_analysis.trim().to_string(),
                etno_function: f.etno_function.trim().to_string(),
                social_reflection: f.social_reflection.trim().to_string(),
                notes_personal: f.notes_personal.trim().to_string(),
                notes_media: f.notes_media.trim().to_string(),
                activity_log: self.activity_log.records().to_vec(),
                interview_log: self.interview_log.records().to_vec(),
            },
        }
    }

    /// Clears the whole draft after a successful submission (or on explicit
    /// clear): all form fields, both sub-logs, the captured geolocation, and
    /// the classification selectors back to their first option.
    pub fn reset(&mut self) {
        self.fields = DraftFields {
            mood: default_mood(),
            theme: default_theme(),
            ..Default::default()
        };
        self.activity_log.clear();
        self.interview_log.clear();
    }
}

/// Splits a raw comma-separated tags field into trimmed, non-empty tags.
///
/// `"a, ,b"` becomes `["a", "b"]`. Order is preserved and duplicates are
/// not deduplicated.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}
