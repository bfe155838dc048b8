//! In-memory free-text filtering over the live entry collection.

use crate::entry::Entry;

/// Filters entries by a single free-text query.
///
/// The query is matched case-insensitively as a substring against title,
/// location, the geolocation string, mood, theme, each tag, and -- for
/// structured entries only -- every free-text field in `data`, every
/// activity's description and kind, and every interview field value.
///
/// The filter is stable: entries come back in the same relative order as
/// the input, and an empty query returns all entries unchanged.
pub fn filter_entries<'a>(query: &str, entries: &'a [Entry]) -> Vec<&'a Entry> {
    if query.is_empty() {
        return entries.iter().collect();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry_matches(entry, &needle))
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn entry_matches(entry: &Entry, needle: &str) -> bool {
    let p = &entry.payload;
    if contains(&p.title, needle)
        || contains(&p.location, needle)
        || contains(&p.geolocation, needle)
        || contains(&p.mood, needle)
        || contains(&p.theme, needle)
        || p.tags.iter().any(|tag| contains(tag, needle))
    {
        return true;
    }

    if !entry.is_structured() {
        return false;
    }

    let data = &p.data;
    data.text_fields().iter().any(|field| contains(field, needle))
        || data
            .activity_log
            .iter()
            .any(|a| contains(&a.description, needle) || contains(&a.kind, needle))
        || data.interview_log.iter().any(|i| {
            [
                &i.time,
                &i.kind,
                &i.role,
                &i.age,
                &i.profession,
                &i.region,
                &i.quote,
            ]
            .iter()
            .any(|value| contains(value, needle))
        })
}
