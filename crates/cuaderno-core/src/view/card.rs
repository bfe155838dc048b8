//! Display summary derivation for saved entries.

use crate::entry::Entry;

use super::{collapse_whitespace, sanitize, truncate_chars};

/// Maximum summary length in characters before the ellipsis kicks in.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Fallback shown when an entry has no summary material at all.
pub const NO_SUMMARY_TEXT: &str = "No hay resumen disponible.";

/// Everything the frontend needs to print one entry, already sanitized.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCard {
    pub title: String,
    pub entry_type: String,
    pub location: String,
    /// Formatted creation timestamp
    pub date: String,
    /// `Some("lat, lon")` when the entry carries coordinates
    pub geolocation: Option<String>,
    pub mood: String,
    pub theme: String,
    pub tags: Vec<String>,
    /// Collapsed, truncated free-text summary with log-count annotations
    pub summary: String,
}

impl EntryCard {
    /// Derives the card for one entry.
    ///
    /// The summary concatenates spatial context, repertoire, social
    /// reflection and personal notes, appends `[Log Act: n]` /
    /// `[Log Int: n]` when the sub-logs are non-empty, collapses
    /// whitespace, and truncates to [`SUMMARY_MAX_CHARS`] characters with
    /// an ellipsis. All user-supplied text is sanitized here, once.
    pub fn from_entry(entry: &Entry) -> Self {
        let p = &entry.payload;

        let mut summary = String::new();
        if entry.is_structured() {
            let parts: Vec<&str> = [
                p.data.context_spatial.as_str(),
                p.data.etno_repertoire.as_str(),
                p.data.social_reflection.as_str(),
                p.data.notes_personal.as_str(),
            ]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
            summary = parts.join(" ");

            if !p.data.activity_log.is_empty() {
                summary.push_str(&format!(" [Log Act: {}]", p.data.activity_log.len()));
            }
            if !p.data.interview_log.is_empty() {
                summary.push_str(&format!(" [Log Int: {}]", p.data.interview_log.len()));
            }
        }

        let summary = truncate_chars(
            &collapse_whitespace(&sanitize(&summary)),
            SUMMARY_MAX_CHARS,
        );
        let summary = if summary.is_empty() {
            NO_SUMMARY_TEXT.to_string()
        } else {
            summary
        };

        Self {
            title: sanitize(&p.title),
            entry_type: sanitize(&p.entry_type),
            location: sanitize(&p.location),
            date: entry.created_at.format("%d %b %Y, %H:%M").to_string(),
            geolocation: if p.geolocation.is_empty() {
                None
            } else {
                Some(sanitize(&p.geolocation))
            },
            mood: if p.mood.is_empty() {
                "N/A".to_string()
            } else {
                sanitize(&p.mood)
            },
            theme: if p.theme.is_empty() {
                "N/A".to_string()
            } else {
                sanitize(&p.theme)
            },
            tags: p.tags.iter().map(|tag| sanitize(tag)).collect(),
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{ActivityRecord, EntryPayload, InterviewRecord, ENTRY_TYPE_STRUCTURED};
    use chrono::Utc;

    fn structured_entry() -> Entry {
        Entry {
            id: "1".to_string(),
            created_at: Utc::now(),
            payload: EntryPayload {
                title: "Visita inicial".to_string(),
                entry_type: ENTRY_TYPE_STRUCTURED.to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_summary_concatenates_fixed_fields_in_order() {
        let mut entry = structured_entry();
        entry.payload.data.context_spatial = "plaza amplia".to_string();
        entry.payload.data.etno_repertoire = "bambucos".to_string();
        entry.payload.data.social_reflection = "ambiente relajado".to_string();
        entry.payload.data.notes_personal = "volver el jueves".to_string();
        // Not part of the summary subset:
        entry.payload.data.etno_analysis = "NO DEBE SALIR".to_string();

        let card = EntryCard::from_entry(&entry);
        assert_eq!(
            card.summary,
            "plaza amplia bambucos ambiente relajado volver el jueves"
        );
    }

    #[test]
    fn test_summary_appends_log_counts() {
        let mut entry = structured_entry();
        entry.payload.data.context_spatial = "plaza".to_string();
        entry.payload.data.activity_log = vec![ActivityRecord::default(), ActivityRecord::default()];
        entry.payload.data.interview_log = vec![InterviewRecord::default()];

        let card = EntryCard::from_entry(&entry);
        assert_eq!(card.summary, "plaza [Log Act: 2] [Log Int: 1]");
    }

    #[test]
    fn test_summary_collapses_whitespace_and_truncates() {
        let mut entry = structured_entry();
        entry.payload.data.context_spatial = format!("a\n\n {} ", "palabra ".repeat(40));

        let card = EntryCard::from_entry(&entry);
        assert!(!card.summary.contains('\n'));
        assert!(card.summary.ends_with("..."));
        assert_eq!(card.summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_empty_summary_falls_back() {
        let card = EntryCard::from_entry(&structured_entry());
        assert_eq!(card.summary, NO_SUMMARY_TEXT);
    }

    #[test]
    fn test_unstructured_entry_has_no_summary_material() {
        let mut entry = structured_entry();
        entry.payload.entry_type = "Libre".to_string();
        entry.payload.data.context_spatial = "no cuenta".to_string();

        let card = EntryCard::from_entry(&entry);
        assert_eq!(card.summary, NO_SUMMARY_TEXT);
    }

    #[test]
    fn test_card_sanitizes_user_text() {
        let mut entry = structured_entry();
        entry.payload.title = "título\x1b[31mrojo".to_string();
        entry.payload.tags = vec!["ok".to_string(), "mal\x07o".to_string()];

        let card = EntryCard::from_entry(&entry);
        assert_eq!(card.title, "título[31mrojo");
        assert_eq!(card.tags[1], "malo");
    }

    #[test]
    fn test_classification_defaults_to_na() {
        let card = EntryCard::from_entry(&structured_entry());
        assert_eq!(card.mood, "N/A");
        assert_eq!(card.theme, "N/A");
    }

    #[test]
    fn test_geolocation_present_only_when_captured() {
        let mut entry = structured_entry();
        assert_eq!(EntryCard::from_entry(&entry).geolocation, None);

        entry.payload.geolocation = "4.600000, -74.080000".to_string();
        assert_eq!(
            EntryCard::from_entry(&entry).geolocation.as_deref(),
            Some("4.600000, -74.080000")
        );
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let mut entry = structured_entry();
        entry.payload.data.context_spatial = "plaza".to_string();
        assert_eq!(
            EntryCard::from_entry(&entry),
            EntryCard::from_entry(&entry)
        );
    }
}
