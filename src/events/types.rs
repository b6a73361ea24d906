//! # Event Types
//!
//! Facts fired by commands after a successful mutation. The payload is the
//! key of the affected entity.

use std::fmt;

/// Something that happened to a stored or published item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A template was removed from the store.
    TemplateDeleted(String),
    TemplateSaved(String),
    /// A local post or page was removed. Payload is the local id.
    LocalPostDeleted(i64),
    /// A post or page was removed from the blog. Payload is the remote id.
    RemotePostDeleted(i64),
    /// A post or page was written to the store. Payload is the local id.
    PostSaved(i64),
    /// A post or page was sent to the blog. Payload is the remote id.
    PostSent(i64),
}

/// Discriminant listeners subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TemplateDeleted,
    TemplateSaved,
    LocalPostDeleted,
    RemotePostDeleted,
    PostSaved,
    PostSent,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::TemplateDeleted(_) => EventKind::TemplateDeleted,
            Event::TemplateSaved(_) => EventKind::TemplateSaved,
            Event::LocalPostDeleted(_) => EventKind::LocalPostDeleted,
            Event::RemotePostDeleted(_) => EventKind::RemotePostDeleted,
            Event::PostSaved(_) => EventKind::PostSaved,
            Event::PostSent(_) => EventKind::PostSent,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::TemplateDeleted(name) => write!(f, "template deleted ({name})"),
            Event::TemplateSaved(name) => write!(f, "template saved ({name})"),
            Event::LocalPostDeleted(id) => write!(f, "local post deleted ({id})"),
            Event::RemotePostDeleted(id) => write!(f, "remote post deleted ({id})"),
            Event::PostSaved(id) => write!(f, "post saved ({id})"),
            Event::PostSent(id) => write!(f, "post sent ({id})"),
        }
    }
}
