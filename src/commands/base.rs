//! # Command Base
//!
//! State and checks shared by every command. Commands that override a
//! phase call [`pre_exec`] or [`post_exec`] explicitly.

use encoding_rs::{Encoding, UTF_8};

use crate::context::AppContext;
use crate::editor::view::current_view;
use crate::error::{Result, UbError};
use crate::models::{ItemType, Scope, Syntax};
use crate::store::Session;

pub struct CommandBase {
    pub item_type: Option<ItemType>,
    pub scope: Scope,
    /// Suffixes of the view names the command may run in. Empty means any.
    pub view_scopes: Vec<&'static str>,
    /// Requires the buffer syntax to be one the converter knows.
    pub content_aware: bool,
    pub needs_store: bool,
    pub needs_api: bool,
    pub encoding: &'static Encoding,
    session: Option<Session>,
}

impl Default for CommandBase {
    fn default() -> Self {
        Self {
            item_type: None,
            scope: Scope::Local,
            view_scopes: Vec::new(),
            content_aware: false,
            needs_store: false,
            needs_api: false,
            encoding: UTF_8,
            session: None,
        }
    }
}

impl CommandBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn view_scopes(mut self, scopes: &[&'static str]) -> Self {
        self.view_scopes = scopes.to_vec();
        self
    }

    pub fn content_aware(mut self) -> Self {
        self.content_aware = true;
        self
    }

    pub fn needs_store(mut self) -> Self {
        self.needs_store = true;
        self
    }

    pub fn needs_api(mut self) -> Self {
        self.needs_api = true;
        self
    }

    pub fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or(UbError::MissingCollaborator("Store session"))
    }

    pub fn session_mut(&mut self) -> Result<&mut Session> {
        self.session
            .as_mut()
            .ok_or(UbError::MissingCollaborator("Store session"))
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Persist the session's changes, if any.
    pub fn commit(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.commit(),
            None => Ok(()),
        }
    }

    /// Drop the session. Uncommitted changes are discarded.
    pub fn release(&mut self) {
        self.session = None;
    }
}

/// Checks every command runs before doing its work.
pub fn pre_exec(base: &mut CommandBase, ctx: &mut AppContext) -> Result<()> {
    if base.needs_store {
        ctx.store()?;
    }
    if base.needs_api {
        ctx.api()?;
    }

    let label = ctx.editor.encoding();
    base.encoding = Encoding::for_label(label.trim().as_bytes()).unwrap_or(UTF_8);

    if !base.view_scopes.is_empty() {
        let allowed = current_view(ctx.editor.as_ref())
            .map(|view| base.view_scopes.iter().any(|s| view.matches_suffix(s)))
            .unwrap_or(false);
        if !allowed {
            return Err(UbError::InvalidView);
        }
    }

    if base.content_aware {
        let filetype = ctx.editor.filetype(ctx.editor.current_buffer());
        filetype.parse::<Syntax>()?;
    }

    if base.needs_store {
        base.session = Some(ctx.open_session()?);
    }
    Ok(())
}

pub fn post_exec(base: &mut CommandBase, _ctx: &mut AppContext) -> Result<()> {
    base.release();
    Ok(())
}
