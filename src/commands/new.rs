//! # New and BlogThis
//!
//! Start a fresh post, page or template in a new edit view.

use super::base::{self, CommandBase};
use super::{execute, Command};
use crate::config::HOMEPAGE;
use crate::context::AppContext;
use crate::editor::view::wise_open;
use crate::editor::{Editor, Placement};
use crate::error::{Result, UbError};
use crate::models::{check_reserved_word, meta, ItemType, Syntax, ViewName};

const TEMPLATE_SKELETON: &str = r#"<html>
    <head>
        <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
        <title>%(title)s</title>
        <style>
        </style>
    </head>
    <body>
        %(content)s
    </body>
</html>"#;

fn promotion_link(syntax: Syntax) -> String {
    match syntax {
        Syntax::Markdown => format!("Posted via [UltraBlog.vim]({HOMEPAGE})."),
        _ => format!("Posted via <a href=\"{HOMEPAGE}\">UltraBlog.vim</a>."),
    }
}

/// `mixed` is the syntax for posts and pages and the name for templates.
pub struct New {
    base: CommandBase,
    item_type: ItemType,
    mixed: String,
    syntax: Syntax,
    categories: String,
}

impl New {
    pub fn new(item_type: ItemType, mixed: impl Into<String>) -> Self {
        let base = CommandBase::new().item_type(item_type);
        let base = if item_type == ItemType::Template {
            base.needs_store()
        } else {
            base
        };
        Self {
            base,
            item_type,
            mixed: mixed.into(),
            syntax: Syntax::Markdown,
            categories: String::new(),
        }
    }

    /// Blog categories, or the configured ones when the blog cannot be asked.
    fn categories(ctx: &AppContext) -> String {
        let configured = || {
            ctx.settings
                .blog
                .as_ref()
                .map(|b| b.categories.clone())
                .unwrap_or_default()
        };
        match ctx.api.as_ref().map(|api| api.categories()) {
            Some(Ok(categories)) => categories.join(", "),
            Some(Err(e)) => {
                tracing::warn!("Cannot fetch categories: {e}");
                configured()
            }
            None => configured(),
        }
    }
}

impl Command for New {
    fn name(&self) -> &'static str {
        "new"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        match self.item_type {
            ItemType::Template => {
                check_reserved_word(&self.mixed)?;
                if self.base.session()?.db().template(&self.mixed).is_some() {
                    return Err(UbError::AlreadyExists(format!(
                        "Template \"{}\" exists !",
                        self.mixed
                    )));
                }
            }
            ItemType::Post | ItemType::Page => {
                self.syntax = self.mixed.parse::<Syntax>()?;
            }
        }
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        if self.item_type == ItemType::Post {
            self.categories = Self::categories(ctx);
        }
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let zero = "0".to_string();
        let (view, fields, filetype) = match self.item_type {
            ItemType::Post => (
                ViewName::PostEdit,
                vec![
                    ("id", zero.clone()),
                    ("post_id", zero),
                    ("title", String::new()),
                    ("categories", std::mem::take(&mut self.categories)),
                    ("tags", String::new()),
                    ("slug", String::new()),
                    ("status", "draft".to_string()),
                ],
                self.syntax.as_str(),
            ),
            ItemType::Page => (
                ViewName::PageEdit,
                vec![
                    ("id", zero.clone()),
                    ("post_id", zero),
                    ("title", String::new()),
                    ("slug", String::new()),
                    ("status", "draft".to_string()),
                ],
                self.syntax.as_str(),
            ),
            ItemType::Template => (
                ViewName::TmplEdit,
                vec![("name", self.mixed.clone()), ("description", String::new())],
                "html",
            ),
        };

        let mut lines = meta::render(&fields);
        match self.item_type {
            ItemType::Template => lines.extend(TEMPLATE_SKELETON.lines().map(str::to_string)),
            _ if ctx.settings.options.append_promotion_link => {
                lines.push(promotion_link(self.syntax))
            }
            _ => {}
        }

        // Cursor goes to the end of the first editable field.
        let cursor_line = if self.item_type == ItemType::Template { 3 } else { 4 };
        let col = lines
            .get(cursor_line - 1)
            .map(|l| l.len().saturating_sub(1))
            .unwrap_or(0);

        let save_key = ctx.settings.options.hotkeys.save_current_item.clone();
        let editor: &mut dyn Editor = ctx.editor.as_mut();
        let buf = wise_open(editor, view, Placement::Current);
        editor.set_lines(buf, lines);
        editor.set_filetype(buf, filetype);
        editor.map_key(buf, &save_key, "UBSave".to_string());
        editor.set_modified(buf, false);
        editor.set_cursor(buf, cursor_line, col);
        tracing::debug!("New {} in buffer {buf}", self.item_type);
        Ok(())
    }
}

/// Turn the current buffer into the body of a new post or page.
pub struct BlogThis {
    base: CommandBase,
    item_type: ItemType,
    syntax: Option<String>,
    snapshot: Vec<String>,
}

impl BlogThis {
    pub fn new(item_type: ItemType, syntax: Option<String>) -> Self {
        Self {
            base: CommandBase::new().item_type(item_type),
            item_type,
            syntax,
            snapshot: Vec::new(),
        }
    }
}

impl Command for BlogThis {
    fn name(&self) -> &'static str {
        "blog-this"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        if self.item_type == ItemType::Template {
            return Err(UbError::InvalidItemType(self.item_type.to_string()));
        }
        base::pre_exec(&mut self.base, ctx)
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let buf = ctx.editor.current_buffer();
        self.snapshot = ctx.editor.lines(buf);
        let requested = self
            .syntax
            .clone()
            .unwrap_or_else(|| ctx.editor.filetype(buf));
        let syntax = requested.parse::<Syntax>().unwrap_or(Syntax::Markdown);
        self.syntax = Some(syntax.as_str().to_string());
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let syntax = self
            .syntax
            .take()
            .unwrap_or_else(|| Syntax::Markdown.as_str().to_string());
        execute(New::new(self.item_type, syntax), ctx)?;

        let buf = ctx.editor.current_buffer();
        let at = meta::close_index(&ctx.editor.lines(buf)).map_or(0, |idx| idx + 1);
        ctx.editor
            .insert_lines(buf, at, std::mem::take(&mut self.snapshot));
        Ok(())
    }
}
