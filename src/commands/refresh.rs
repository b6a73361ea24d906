//! # Refresh
//!
//! Re-render the current view from its source: lists and search results
//! are queried again, edit views are re-opened from the store.

use super::base::CommandBase;
use super::list::{Find, List, KEYWORDS_VAR, PAGE_NO_VAR, PAGE_SIZE_VAR};
use super::open::Open;
use super::{execute, Command};
use crate::context::AppContext;
use crate::editor::view::{current_view, is_outdated, set_outdated};
use crate::editor::Placement;
use crate::error::{Result, UbError};
use crate::models::{meta, ItemType, Scope, ViewName};

pub struct Refresh {
    base: CommandBase,
}

impl Default for Refresh {
    fn default() -> Self {
        Self::new()
    }
}

impl Refresh {
    pub fn new() -> Self {
        Self {
            base: CommandBase::new(),
        }
    }
}

fn number_var(ctx: &AppContext, key: &str) -> Option<i64> {
    ctx.editor
        .var(ctx.editor.current_buffer(), key)
        .and_then(|v| v.trim().parse::<i64>().ok())
}

fn refresh_edit(ctx: &mut AppContext, view: ViewName, item_type: ItemType) -> Result<()> {
    let buf = ctx.editor.current_buffer();
    let lines = ctx.editor.lines(buf);
    let key = match view {
        ViewName::TmplEdit => meta::get(&lines, "name").filter(|n| !n.is_empty()),
        _ => meta::get_id(&lines, "id").map(|id| id.to_string()),
    }
    .ok_or(UbError::MissingKey)?;

    let was_modified = ctx.editor.is_modified(buf);
    ctx.editor.set_modified(buf, false);
    let result = execute(
        Open::new(item_type, key, Scope::Local, Placement::Current),
        ctx,
    );
    if result.is_err() {
        ctx.editor.set_modified(buf, was_modified);
    }
    result
}

impl Command for Refresh {
    fn name(&self) -> &'static str {
        "refresh"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let Some(view) = current_view(ctx.editor.as_ref()) else {
            return Err(UbError::NotImplemented(
                "refresh for this buffer".to_string(),
            ));
        };
        tracing::debug!("Refreshing {view}");
        let page_no = number_var(ctx, PAGE_NO_VAR).unwrap_or(1);

        match (view, view.item_type()) {
            (ViewName::SearchResultList, _) => {
                let keywords: Vec<String> = ctx
                    .editor
                    .var(ctx.editor.current_buffer(), KEYWORDS_VAR)
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()?
                    .unwrap_or_default();
                execute(Find::new(page_no, keywords), ctx)
            }
            (view, Some(item_type)) if view.is_list() => {
                let page_size = number_var(ctx, PAGE_SIZE_VAR);
                execute(List::new(item_type, view.scope(), page_size, page_no), ctx)
            }
            (view, Some(item_type)) if view.is_edit() => refresh_edit(ctx, view, item_type),
            _ => Err(UbError::NotImplemented(format!("refresh for {view}"))),
        }
    }
}

/// Refresh whatever view has focus.
pub fn refresh_current(ctx: &mut AppContext) -> Result<()> {
    execute(Refresh::new(), ctx)
}

/// Bring a view flagged outdated up to date when it gains focus.
pub fn on_buffer_enter(ctx: &mut AppContext) -> Result<()> {
    let buf = ctx.editor.current_buffer();
    if !is_outdated(ctx.editor.as_ref(), buf) {
        return Ok(());
    }
    set_outdated(ctx.editor.as_mut(), buf, false);
    let result = refresh_current(ctx);
    if result.is_err() {
        set_outdated(ctx.editor.as_mut(), buf, true);
    }
    result
}
