//! Data shapes for field observation entries.
//!
//! These are the "pure" domain models that the composer and the filter
//! engine operate on, independent of any specific storage backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only entry type this client produces.
pub const ENTRY_TYPE_STRUCTURED: &str = "Structured";

/// Unique identifier assigned by the document store on append.
pub type EntryId = String;

/// One row of the activity sub-log.
///
/// Immutable once appended; identified only by its position in the owning
/// sub-log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    /// Time of day, `HH:MM`
    pub time: String,
    /// Free-form activity category ("Observación", "Traslado", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// One row of the interview sub-log.
///
/// `kind` is expected to be "Formal" or "Informal" but is not enforced.
/// `age`, `profession` and `region` are optional and default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewRecord {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Informant role ("vendedor", "músico", ...)
    pub role: String,
    pub age: String,
    pub profession: String,
    pub region: String,
    /// Representative quote; required.
    pub quote: String,
}

impl InterviewRecord {
    pub fn is_formal(&self) -> bool {
        self.kind == "Formal"
    }

    /// Pipe-joined informant profile, e.g. `"34 años | carpintero | Boyacá"`.
    /// Empty components are dropped.
    pub fn profile(&self) -> String {
        let mut parts = Vec::new();
        if !self.age.is_empty() {
            parts.push(format!("{} años", self.age));
        }
        if !self.profession.is_empty() {
            parts.push(self.profession.clone());
        }
        if !self.region.is_empty() {
            parts.push(self.region.clone());
        }
        parts.join(" | ")
    }
}

/// The structured observation body of an entry.
///
/// All free-text fields default to the empty string, never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredData {
    pub context_spatial: String,
    pub context_demography: String,
    pub context_social: String,
    pub etno_repertoire: String,
    pub etno_analysis: String,
    pub etno_function: String,
    pub social_reflection: String,
    pub notes_personal: String,
    pub notes_media: String,
    pub activity_log: Vec<ActivityRecord>,
    pub interview_log: Vec<InterviewRecord>,
}

impl StructuredData {
    /// All free-text field values, in declaration order. Used by the filter
    /// engine, which matches against every one of them.
    pub fn text_fields(&self) -> [&str; 9] {
        [
            &self.context_spatial,
            &self.context_demography,
            &self.context_social,
            &self.etno_repertoire,
            &self.etno_analysis,
            &self.etno_function,
            &self.social_reflection,
            &self.notes_personal,
            &self.notes_media,
        ]
    }
}

/// Submission-time payload, immutable once sent.
///
/// The store assigns the id and the authoritative creation timestamp; the
/// payload itself carries neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPayload {
    pub title: String,
    pub location: String,
    /// `"lat, lon"` string, empty when not captured
    pub geolocation: String,
    /// Trimmed, non-empty tags; order preserved, duplicates kept
    pub tags: Vec<String>,
    pub mood: String,
    pub theme: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub data: StructuredData,
}

/// A saved entry as delivered by the document store.
///
/// Immutable from the client's perspective; entries are only ever created
/// (or deleted upstream), never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned unique id
    pub id: EntryId,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EntryPayload,
}

impl Entry {
    /// Whether this entry carries a [`StructuredData`] body. Only structured
    /// entries have their `data` fields searched by the filter engine.
    pub fn is_structured(&self) -> bool {
        self.payload.entry_type == ENTRY_TYPE_STRUCTURED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_profile_joins_non_empty_parts() {
        let record = InterviewRecord {
            time: "10:30".to_string(),
            kind: "Informal".to_string(),
            role: "vendedor".to_string(),
            age: "34".to_string(),
            profession: String::new(),
            region: "Boyacá".to_string(),
            quote: "...".to_string(),
        };
        assert_eq!(record.profile(), "34 años | Boyacá");
    }

    #[test]
    fn test_interview_profile_empty() {
        let record = InterviewRecord::default();
        assert_eq!(record.profile(), "");
    }

    #[test]
    fn test_entry_round_trips_with_flattened_payload() {
        let entry = Entry {
            id: "abc".to_string(),
            created_at: Utc::now(),
            payload: EntryPayload {
                title: "Visita".to_string(),
                entry_type: ENTRY_TYPE_STRUCTURED.to_string(),
                ..Default::default()
            },
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);

        // The payload fields sit at the top level of the document.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Visita");
        assert_eq!(value["type"], "Structured");
    }

    #[test]
    fn test_structured_data_missing_fields_default_to_empty() {
        let data: StructuredData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, StructuredData::default());
        assert!(data.text_fields().iter().all(|f| f.is_empty()));
    }
}
