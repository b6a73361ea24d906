//! # Delete
//!
//! Remove an item locally or from the blog after the user confirms.

use super::base::{self, CommandBase};
use super::open::{parse_list_line, ListTarget};
use super::{execute, Command};
use crate::context::AppContext;
use crate::error::{Result, UbError};
use crate::events::{process_events, Event};
use crate::models::{ItemType, PostType, Scope};

pub struct Delete {
    base: CommandBase,
    item_type: ItemType,
    key: String,
    scope: Scope,
    display_name: String,
    event: Option<Event>,
}

impl Delete {
    pub fn new(item_type: ItemType, key: impl Into<String>, scope: Scope) -> Self {
        let base = CommandBase::new().item_type(item_type).scope(scope);
        let base = match scope {
            Scope::Local => base.needs_store(),
            Scope::Remote => base.needs_api(),
        };
        let key = key.into();
        Self {
            base,
            item_type,
            display_name: key.clone(),
            key,
            scope,
            event: None,
        }
    }

    fn id(&self) -> Result<i64> {
        self.key
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| UbError::NotFound(format!("Invalid id: {} !", self.key)))
    }

    /// Resolve the name shown to the user. Local items must exist.
    fn lookup(&mut self) -> Result<()> {
        if self.scope == Scope::Remote {
            self.id()?;
            return Ok(());
        }
        let db = self.base.session()?.db();
        let name = match PostType::from_item_type(self.item_type) {
            None => db.template(self.key.trim()).map(|t| t.name.clone()),
            Some(post_type) => db.post(self.id()?, Some(post_type)).map(|p| p.title.clone()),
        };
        self.display_name = name.ok_or_else(|| {
            UbError::NotFound(format!(
                "No {} found: {} !",
                self.item_type.display_name(),
                self.key
            ))
        })?;
        Ok(())
    }
}

impl Command for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        if self.scope == Scope::Remote && self.item_type == ItemType::Template {
            return Err(UbError::InvalidScope(self.scope.to_string()));
        }
        base::pre_exec(&mut self.base, ctx)?;
        self.lookup()?;

        let prompt = format!(
            "Are you sure to delete {} {} \"{}\" ?",
            self.scope,
            self.item_type.display_name(),
            self.display_name
        );
        if !ctx.editor.confirm(&prompt) {
            return Err(UbError::Declined(format!(
                "Deletion of {} {} \"{}\" cancelled !",
                self.scope,
                self.item_type.display_name(),
                self.display_name
            )));
        }
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let event = match (self.scope, PostType::from_item_type(self.item_type)) {
            (_, None) => {
                let name = self.key.trim().to_string();
                self.base.session_mut()?.db_mut().delete_template(&name);
                Event::TemplateDeleted(name)
            }
            (Scope::Local, Some(_)) => {
                let id = self.id()?;
                self.base.session_mut()?.db_mut().delete_post(id);
                Event::LocalPostDeleted(id)
            }
            (Scope::Remote, Some(post_type)) => {
                let post_id = self.id()?;
                let api = ctx.api()?;
                match post_type {
                    PostType::Post => api.delete_post(post_id)?,
                    PostType::Page => api.delete_page(post_id)?,
                }
                Event::RemotePostDeleted(post_id)
            }
        };
        tracing::info!("Deleted {} {} {}", self.scope, self.item_type, self.key);
        self.event = Some(event);
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let Some(event) = self.event.take() else {
            return Ok(());
        };
        ctx.editor.echo(&format!(
            "{} {} \"{}\" was deleted !",
            capitalize(self.scope.as_str()),
            self.item_type.display_name(),
            self.display_name
        ));
        ctx.events.fire(event);
        process_events(ctx);
        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Delete the item on the list line under the cursor: the local copy when
/// the line has a local id, the blog copy when it has a remote id. Each
/// deletion is confirmed on its own.
pub struct DeleteUnderCursor {
    base: CommandBase,
    target: Option<ListTarget>,
}

impl Default for DeleteUnderCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteUnderCursor {
    pub fn new() -> Self {
        Self {
            base: CommandBase::new().view_scopes(&["list"]).needs_store(),
            target: None,
        }
    }
}

impl Command for DeleteUnderCursor {
    fn name(&self) -> &'static str {
        "delete-under-cursor"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        self.target = Some(parse_list_line(ctx, self.base.session()?.db())?);
        Ok(())
    }

    fn exec(&mut self, _ctx: &mut AppContext) -> Result<()> {
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        match self.target.take() {
            Some(ListTarget::Template(name)) => {
                execute(Delete::new(ItemType::Template, name, Scope::Local), ctx)
            }
            Some(ListTarget::Post {
                item_type,
                id,
                post_id,
            }) => {
                if id.is_none() && post_id.is_none() {
                    return Err(UbError::InvalidLine);
                }
                if let Some(id) = id {
                    match execute(Delete::new(item_type, id.to_string(), Scope::Local), ctx) {
                        Err(UbError::Declined(message)) => ctx.editor.echo(&message),
                        other => other?,
                    }
                }
                if let Some(post_id) = post_id {
                    execute(
                        Delete::new(item_type, post_id.to_string(), Scope::Remote),
                        ctx,
                    )?;
                }
                Ok(())
            }
            None => Err(UbError::InvalidLine),
        }
    }
}
