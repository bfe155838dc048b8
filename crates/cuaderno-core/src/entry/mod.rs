//! Entry domain models.
//!
//! An entry is one saved, immutable field observation record. While it is
//! being edited it lives in a [`crate::draft::Draft`]; once submitted it only
//! exists on the read side as an [`Entry`].

pub mod model;
pub mod sublog;

pub use model::{
    ActivityRecord, Entry, EntryId, EntryPayload, InterviewRecord, StructuredData,
    ENTRY_TYPE_STRUCTURED,
};
pub use sublog::{SubLog, SubLogRecord};
