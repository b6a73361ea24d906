//! # Models
//!
//! Typed domain values, stored entities and the buffer header format.

pub mod entity;
pub mod meta;
pub mod types;

pub use entity::{Entity, Item, Post, PostType, Template};
pub use types::{check_reserved_word, ItemType, Scope, Status, Syntax, ViewName};
