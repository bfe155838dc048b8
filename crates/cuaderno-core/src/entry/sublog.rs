//! Append-only editable sub-logs.
//!
//! A sub-log is an ordered, user-editable list of structured records
//! (activities or interviews) embedded within a single draft entry.
//! Insertion order is display order and records are index-addressable for
//! removal. Required fields are validated at append time, not at read time.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CuadernoError, Result};
use super::model::{ActivityRecord, InterviewRecord};

/// A record type that can live in a [`SubLog`].
pub trait SubLogRecord: Clone + Serialize + DeserializeOwned {
    /// Checks that all required fields are non-empty.
    ///
    /// Returns a [`CuadernoError::Validation`] carrying a user-facing
    /// message on failure.
    fn validate(&self) -> Result<()>;
}

impl SubLogRecord for ActivityRecord {
    fn validate(&self) -> Result<()> {
        if self.time.trim().is_empty() || self.description.trim().is_empty() {
            return Err(CuadernoError::validation(
                "¡ERROR! Hora y descripción de la actividad son requeridas.",
            ));
        }
        Ok(())
    }
}

impl SubLogRecord for InterviewRecord {
    fn validate(&self) -> Result<()> {
        if self.time.trim().is_empty()
            || self.role.trim().is_empty()
            || self.quote.trim().is_empty()
        {
            return Err(CuadernoError::validation(
                "¡ERROR! Hora, Rol y Cita son requeridos para la interacción.",
            ));
        }
        Ok(())
    }
}

/// An ordered sequence of sub-log records owned by the in-progress draft.
///
/// The typed sequence is the in-memory representation; the JSON form
/// produced by [`SubLog::to_json`] is purely a wire/storage format.
#[derive(Debug, Clone, PartialEq)]
pub struct SubLog<T> {
    records: Vec<T>,
}

impl<T> Default for SubLog<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: SubLogRecord> SubLog<T> {
    /// Creates an empty sub-log.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in insertion (= display) order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Validates and appends a record to the end of the log.
    ///
    /// On validation failure the sequence is unchanged and the error carries
    /// a user-facing message.
    pub fn append(&mut self, record: T) -> Result<()> {
        record.validate()?;
        self.records.push(record);
        Ok(())
    }

    /// Removes the record at `index`.
    ///
    /// An out-of-range index cannot happen through a well-formed UI, so it
    /// is reported as a validation error rather than failing silently.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.records.len() {
            return Err(CuadernoError::validation(format!(
                "Índice de registro fuera de rango: {}",
                index
            )));
        }
        Ok(self.records.remove(index))
    }

    /// Clears all records (draft reset or explicit clear).
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Serializes the sequence to its JSON array form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Rebuilds a sub-log from its JSON array form.
    ///
    /// Malformed input fails with a parse error. Defaulting to an empty
    /// sequence is an acceptable recovery at load time only; callers must
    /// never swallow this error on a user-triggered action.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<T> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    /// Hydrates from stored JSON, falling back to an empty log.
    ///
    /// Load-time recovery path: a parse failure is logged and discarded.
    pub fn from_json_or_empty(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Discarding malformed sub-log JSON: {}", e);
                Self::new()
            }
        }
    }
}
