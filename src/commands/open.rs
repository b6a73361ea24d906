//! # Open
//!
//! Load an item into an edit view, either by key or from the list line
//! under the cursor.

use super::base::{self, CommandBase};
use super::{execute, Command};
use crate::context::AppContext;
use crate::editor::view::{current_view, wise_open};
use crate::editor::{Editor, Placement};
use crate::error::{Result, UbError};
use crate::models::{meta, Entity, Item, ItemType, Post, PostType, Scope, ViewName};
use crate::remote::RemotePost;
use crate::store::Database;

pub struct Open {
    base: CommandBase,
    item_type: ItemType,
    key: String,
    scope: Scope,
    placement: Placement,
    opened: Option<(Entity, bool)>,
}

impl Open {
    pub fn new(
        item_type: ItemType,
        key: impl Into<String>,
        scope: Scope,
        placement: Placement,
    ) -> Self {
        let mut base = CommandBase::new()
            .item_type(item_type)
            .scope(scope)
            .needs_store();
        if scope == Scope::Remote {
            base = base.needs_api();
        }
        Self {
            base,
            item_type,
            key: key.into(),
            scope,
            placement,
            opened: None,
        }
    }

    fn id(&self) -> Result<i64> {
        self.key.trim().parse::<i64>().map_err(|_| {
            UbError::NotFound(format!(
                "Invalid {} id: {} !",
                self.item_type.display_name(),
                self.key
            ))
        })
    }
}

fn not_found(item_type: ItemType) -> UbError {
    UbError::NotFound(format!("No {} found !", item_type.display_name()))
}

/// Transient local copy of an item that only exists on the blog.
fn from_remote(remote: RemotePost, post_type: PostType) -> Post {
    let mut post = Post::new(post_type);
    post.post_id = Some(remote.post_id);
    post.title = remote.title;
    post.content = remote.description;
    if post_type == PostType::Post {
        post.categories = remote.categories.join(", ");
        post.tags = remote.tags;
    }
    post.slug = remote.slug;
    post.status = remote.status;
    post.syntax = "html".to_string();
    post
}

impl Command for Open {
    fn name(&self) -> &'static str {
        "open"
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
        base::pre_exec(&mut self.base, ctx)
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let opened = match (self.scope, self.item_type) {
            (_, ItemType::Template) => {
                let db = self.base.session()?.db();
                let template = db
                    .template(self.key.trim())
                    .cloned()
                    .ok_or_else(|| not_found(self.item_type))?;
                (Entity::Template(template), false)
            }
            (Scope::Local, item_type) => {
                let id = self.id()?;
                let post_type = PostType::from_item_type(item_type);
                let post = self
                    .base
                    .session()?
                    .db()
                    .post(id, post_type)
                    .cloned()
                    .ok_or_else(|| not_found(item_type))?;
                (Entity::Post(post), false)
            }
            (Scope::Remote, item_type) => {
                let post_id = self.id()?;
                let post_type = PostType::from_item_type(item_type).unwrap_or_default();
                let local = self
                    .base
                    .session()?
                    .db()
                    .post_by_remote_id(post_id, Some(post_type))
                    .cloned();
                match local {
                    Some(post) => (Entity::Post(post), false),
                    None => {
                        let api = ctx.api()?;
                        let remote = match post_type {
                            PostType::Post => api.get_post(post_id)?,
                            PostType::Page => api.get_page(post_id)?,
                        };
                        let mut post = from_remote(remote, post_type);
                        if ctx.settings.options.save_after_opened {
                            let id = self
                                .base
                                .session_mut()?
                                .db_mut()
                                .save_post(post.clone());
                            post.id = Some(id);
                            tracing::info!("Stored remote item {post_id} locally as {id}");
                            (Entity::Post(post), false)
                        } else {
                            (Entity::Post(post), true)
                        }
                    }
                }
            }
        };
        self.opened = Some(opened);
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let Some((entity, modified)) = self.opened.take() else {
            return Ok(());
        };
        let fields = entity.meta();
        let mut lines = meta::render(&fields);
        lines.extend(entity.content().split('\n').map(str::to_string));

        let save_key = ctx.settings.options.hotkeys.save_current_item.clone();
        let editor: &mut dyn Editor = ctx.editor.as_mut();
        let buf = wise_open(editor, entity.edit_view(), self.placement);
        editor.set_lines(buf, lines);
        editor.set_filetype(buf, entity.syntax());
        editor.map_key(buf, &save_key, "UBSave".to_string());
        editor.set_modified(buf, modified);
        editor.set_cursor(buf, fields.len() + 3, 0);
        tracing::debug!("Opened {} {} in buffer {buf}", self.item_type, entity.key());
        Ok(())
    }
}

/// What a list line points at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListTarget {
    Template(String),
    Post {
        item_type: ItemType,
        id: Option<i64>,
        post_id: Option<i64>,
    },
}

/// Parse the line under the cursor of a list view.
///
/// Template lists start with the name. Other lists need at least three
/// tokens, the first two being the local and the remote id.
pub(crate) fn parse_list_line(ctx: &AppContext, db: &Database) -> Result<ListTarget> {
    let editor: &dyn Editor = ctx.editor.as_ref();
    let (line_no, _) = editor.cursor(editor.current_buffer());
    if line_no <= 1 {
        return Err(UbError::InvalidLine);
    }
    let view = current_view(editor).ok_or(UbError::InvalidView)?;
    let line = editor.current_line();
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if view == ViewName::LocalTmplList {
        return tokens
            .first()
            .map(|name| ListTarget::Template(name.to_string()))
            .ok_or(UbError::InvalidLine);
    }

    if tokens.len() < 3 {
        return Err(UbError::InvalidLine);
    }
    let (Ok(id), Ok(post_id)) = (tokens[0].parse::<i64>(), tokens[1].parse::<i64>()) else {
        return Err(UbError::InvalidLine);
    };
    let id = Some(id).filter(|v| *v > 0);
    let post_id = Some(post_id).filter(|v| *v > 0);

    let item_type = match view.item_type() {
        Some(item_type) => item_type,
        None => id
            .and_then(|id| db.post(id, None))
            .map(|post| post.post_type.item_type())
            .ok_or(UbError::InvalidLine)?,
    };
    Ok(ListTarget::Post {
        item_type,
        id,
        post_id,
    })
}

/// Open the item on the list line under the cursor.
pub struct OpenUnderCursor {
    base: CommandBase,
    placement: Placement,
    target: Option<ListTarget>,
}

impl OpenUnderCursor {
    pub fn new(placement: Placement) -> Self {
        Self {
            base: CommandBase::new().view_scopes(&["list"]).needs_store(),
            placement,
            target: None,
        }
    }
}

impl Command for OpenUnderCursor {
    fn name(&self) -> &'static str {
        "open-under-cursor"
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
        let open = match self.target.take() {
            Some(ListTarget::Template(name)) => {
                Open::new(ItemType::Template, name, Scope::Local, self.placement)
            }
            Some(ListTarget::Post {
                item_type,
                id: Some(id),
                ..
            }) => Open::new(item_type, id.to_string(), Scope::Local, self.placement),
            Some(ListTarget::Post {
                item_type,
                post_id: Some(post_id),
                ..
            }) => Open::new(item_type, post_id.to_string(), Scope::Remote, self.placement),
            _ => return Err(UbError::InvalidLine),
        };
        execute(open, ctx)
    }
}
