//! # List and Find
//!
//! Render a page of items into a list view. Each row shows the local id,
//! the remote id (0 when never sent), the status and the title.

use super::base::{self, CommandBase};
use super::Command;
use crate::context::AppContext;
use crate::editor::view::wise_open;
use crate::editor::{BufferId, Editor, Placement};
use crate::error::{Result, UbError};
use crate::models::{ItemType, PostType, Scope, ViewName};
use crate::remote::RemoteSummary;
use crate::store::{Database, Summary};

pub const PAGE_NO_VAR: &str = "page_no";
pub const PAGE_SIZE_VAR: &str = "page_size";
pub const KEYWORDS_VAR: &str = "ub_keywords";

fn banner(title: &str) -> String {
    format!("==================== {title} ====================")
}

fn row(widths: &[usize; 3], s: &Summary) -> String {
    format!(
        "{:<w1$}{:<w2$}{:<w3$}{}",
        s.id,
        s.post_id,
        s.status,
        s.title,
        w1 = widths[0],
        w2 = widths[1],
        w3 = widths[2]
    )
}

/// Remote rows carry the id of the local copy, whose status wins.
fn annotate(db: &Database, post_type: PostType, remote: Vec<RemoteSummary>) -> Vec<Summary> {
    remote
        .into_iter()
        .map(|r| match db.post_by_remote_id(r.post_id, Some(post_type)) {
            Some(local) => Summary {
                id: local.id.unwrap_or(0),
                post_id: r.post_id,
                status: local.status.clone(),
                title: r.title,
            },
            None => Summary {
                id: 0,
                post_id: r.post_id,
                status: r.status,
                title: r.title,
            },
        })
        .collect()
}

struct Rendered {
    view: ViewName,
    lines: Vec<String>,
}

/// Put rendered rows into a fresh list view and bind the list keys.
fn show(ctx: &mut AppContext, rendered: Rendered, page: Option<(i64, i64)>) -> BufferId {
    let editor: &mut dyn Editor = ctx.editor.as_mut();
    let id = wise_open(editor, rendered.view, Placement::Current);
    editor.set_lines(id, rendered.lines);

    if let Some((page_no, page_size)) = page {
        editor.set_var(id, PAGE_NO_VAR, page_no.to_string());
        editor.set_var(id, PAGE_SIZE_VAR, page_size.to_string());
    }

    let hotkeys = &ctx.settings.options.hotkeys;
    editor.map_key(
        id,
        &hotkeys.open_in_current_view,
        "UBOpenUnderCursor cur".to_string(),
    );
    editor.map_key(
        id,
        &hotkeys.open_in_splitted_view,
        "UBOpenUnderCursor split".to_string(),
    );
    editor.map_key(
        id,
        &hotkeys.open_in_tabbed_view,
        "UBOpenUnderCursor tab".to_string(),
    );
    editor.map_key(id, &hotkeys.delete_item, "UBDelUnderCursor".to_string());

    editor.set_modified(id, false);
    editor.set_modifiable(id, false);
    editor.set_cursor(id, 2, 0);
    id
}

fn check_paging(page_no: i64, page_size: i64) -> Result<()> {
    if page_no < 1 || page_size < 1 {
        return Err(UbError::InvalidPaging { page_no, page_size });
    }
    Ok(())
}

/// List posts, pages or templates, locally or on the blog.
pub struct List {
    base: CommandBase,
    item_type: ItemType,
    scope: Scope,
    page_no: i64,
    page_size: Option<i64>,
    rendered: Option<Rendered>,
}

impl List {
    /// `page_size` falls back to the configured size for the scope.
    pub fn new(item_type: ItemType, scope: Scope, page_size: Option<i64>, page_no: i64) -> Self {
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
            scope,
            page_no,
            page_size,
            rendered: None,
        }
    }

    fn resolved_page_size(&self, ctx: &AppContext) -> i64 {
        self.page_size
            .unwrap_or_else(|| ctx.settings.options.pagesize_for(self.scope))
    }

    fn title(&self) -> String {
        match (self.scope, self.item_type) {
            (_, ItemType::Template) => "Templates".to_string(),
            (Scope::Local, ItemType::Post) => format!("Posts (Page {})", self.page_no),
            (Scope::Local, ItemType::Page) => "Local Pages".to_string(),
            (Scope::Remote, ItemType::Post) => "Recent Posts".to_string(),
            (Scope::Remote, ItemType::Page) => "Blog Pages".to_string(),
        }
    }
}

impl Command for List {
    fn name(&self) -> &'static str {
        "list"
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
        let page_size = self.resolved_page_size(ctx);
        check_paging(self.page_no, page_size)?;
        self.page_size = Some(page_size);
        base::pre_exec(&mut self.base, ctx)
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let page_size = self.resolved_page_size(ctx);
        let widths = ctx.settings.options.list_col_widths;
        let db = self.base.session()?.db();

        let lines: Vec<String> = match (self.scope, PostType::from_item_type(self.item_type)) {
            (_, None) => db
                .templates()
                .iter()
                .map(|t| format!("{:<24}{}", t.name, t.description))
                .collect(),
            (Scope::Local, Some(post_type)) => db
                .list_posts(post_type, self.page_no, page_size)
                .iter()
                .map(|s| row(&widths, s))
                .collect(),
            (Scope::Remote, Some(post_type)) => {
                let api = ctx.api()?;
                let remote = match post_type {
                    PostType::Post => api.recent_posts(page_size as usize)?,
                    PostType::Page => api.pages()?,
                };
                annotate(db, post_type, remote)
                    .iter()
                    .map(|s| row(&widths, s))
                    .collect()
            }
        };

        if lines.is_empty() {
            return Err(UbError::NoMoreItems);
        }

        let mut all = Vec::with_capacity(lines.len() + 1);
        all.push(banner(&self.title()));
        all.extend(lines);
        self.rendered = Some(Rendered {
            view: ViewName::list_of(self.scope, self.item_type),
            lines: all,
        });
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let Some(rendered) = self.rendered.take() else {
            return Ok(());
        };
        let page_size = self.resolved_page_size(ctx);
        let id = show(ctx, rendered, Some((self.page_no, page_size)));

        if self.scope == Scope::Local && self.item_type != ItemType::Template {
            let hotkeys = ctx.settings.options.hotkeys.clone();
            let pager = |page_no: i64| {
                format!(
                    "UBList {} {} {} {}",
                    self.item_type, self.scope, page_size, page_no
                )
            };
            ctx.editor.map_key(
                id,
                &hotkeys.pagedown,
                pager(self.page_no.saturating_add(1)),
            );
            ctx.editor.map_key(
                id,
                &hotkeys.pageup,
                pager(self.page_no.saturating_sub(1)),
            );
        }
        tracing::debug!("Listed {} {} items", self.scope, self.item_type);
        Ok(())
    }
}

/// Search local posts and pages. Every keyword must appear in the title
/// or the content.
pub struct Find {
    base: CommandBase,
    page_no: i64,
    keywords: Vec<String>,
    page_size: i64,
    rendered: Option<Rendered>,
}

impl Find {
    pub fn new(page_no: i64, keywords: Vec<String>) -> Self {
        Self {
            base: CommandBase::new().needs_store(),
            page_no,
            keywords,
            page_size: 0,
            rendered: None,
        }
    }
}

impl Command for Find {
    fn name(&self) -> &'static str {
        "find"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.page_size = ctx.settings.options.search_pagesize;
        check_paging(self.page_no, self.page_size)?;
        base::pre_exec(&mut self.base, ctx)
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let widths = ctx.settings.options.list_col_widths;
        let rows = self
            .base
            .session()?
            .db()
            .find(&self.keywords, self.page_no, self.page_size);
        if rows.is_empty() {
            return Err(UbError::NoMoreItems);
        }

        let mut lines = vec![banner(&format!("Results (Page {})", self.page_no))];
        lines.extend(rows.iter().map(|s| row(&widths, s)));
        self.rendered = Some(Rendered {
            view: ViewName::SearchResultList,
            lines,
        });
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let Some(rendered) = self.rendered.take() else {
            return Ok(());
        };
        let id = show(ctx, rendered, Some((self.page_no, self.page_size)));
        ctx.editor
            .set_var(id, KEYWORDS_VAR, serde_json::to_string(&self.keywords)?);

        let hotkeys = ctx.settings.options.hotkeys.clone();
        let keywords = self.keywords.join(" ");
        ctx.editor.map_key(
            id,
            &hotkeys.pagedown,
            format!("UBFind {} {keywords}", self.page_no.saturating_add(1)),
        );
        ctx.editor.map_key(
            id,
            &hotkeys.pageup,
            format!("UBFind {} {keywords}", self.page_no.saturating_sub(1)),
        );
        Ok(())
    }
}
