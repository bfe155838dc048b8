//! Application layer: use cases wiring the domain to its collaborators.
//!
//! Everything here is frontend-agnostic. The controller and services own
//! the mutable state and publish changes over watch channels; a frontend
//! subscribes and prints, nothing more.

pub mod composer;
pub mod controller;
pub mod geolocation;
pub mod live_store;
pub mod notification;

pub use composer::EntryComposer;
pub use controller::{AppController, AppPhase, ListView};
pub use geolocation::{GeolocationService, GeolocationStatus};
pub use live_store::{ListState, LiveEntryStore};
pub use notification::{Notice, NoticeCenter, NoticeSeverity};
