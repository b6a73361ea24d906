//! # Events
//!
//! Commands fire [`Event`]s after they mutate the store or the blog. The
//! [`EventQueue`] hands them to [`Listener`]s, which bring the other open
//! views up to date.

pub mod listeners;
pub mod queue;
pub mod types;

pub use queue::{process_events, EventQueue, Listener};
pub use types::{Event, EventKind};
