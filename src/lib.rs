//! # UltraBlog - Blogging from the Editor
//!
//! Command and event core of an editor blogging client. Posts, pages and
//! templates live in a local store, are edited in editor buffers with a
//! metadata header, and are published to a metaWeblog/WordPress blog over
//! XML-RPC.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  ex line   ┌──────────────┐  execute  ┌────────────┐
//! │   Shell /  │───────────►│    entry     │──────────►│  commands  │
//! │   Editor   │◄───────────│ (error guard)│           │ pre → exec │
//! └────────────┘  messages  └──────────────┘           │ → post     │
//!       ▲                                              └─────┬──────┘
//!       │ refresh / close                                    │ fire
//!       │                  ┌──────────────┐                  ▼
//!       └──────────────────│  listeners   │◄──────────── EventQueue
//!                          └──────────────┘
//! ```
//!
//! Collaborators hang off [`AppContext`]: the [`store::Store`], the
//! [`remote::BlogApi`], the [`convert::Converter`] and the
//! [`editor::Editor`].

pub mod cmd_args;
pub mod commands;
pub mod config;
pub mod context;
pub mod convert;
pub mod editor;
pub mod entry;
pub mod error;
pub mod events;
pub mod models;
pub mod remote;
pub mod shell;
pub mod store;

pub use config::Settings;
pub use context::AppContext;
pub use error::{Result, UbError};
