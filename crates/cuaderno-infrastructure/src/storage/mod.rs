//! Storage primitives for the on-disk document store.

pub mod atomic_json;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
