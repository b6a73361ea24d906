//! # Send
//!
//! Publish the current post or page to the blog. The body is converted to
//! HTML first. An item without a remote id is created, any other item is
//! updated in place.

use super::base::{self, CommandBase};
use super::save::Save;
use super::{execute, Command};
use crate::context::AppContext;
use crate::editor::view::current_view;
use crate::error::{Result, UbError};
use crate::events::{process_events, Event};
use crate::models::{meta, PostType, Status, Syntax, ViewName};
use crate::remote::PostContent;

pub struct SendItem {
    base: CommandBase,
    status: Option<String>,
    resolved: Option<Status>,
    post_type: PostType,
    sent: Option<i64>,
}

impl SendItem {
    /// Without a status the header's status is used.
    pub fn new(status: Option<String>) -> Self {
        Self {
            base: CommandBase::new()
                .view_scopes(&["post_edit", "page_edit"])
                .content_aware()
                .needs_api(),
            status,
            resolved: None,
            post_type: PostType::Post,
            sent: None,
        }
    }
}

fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

impl Command for SendItem {
    fn name(&self) -> &'static str {
        "send"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        let lines = ctx.editor.lines(ctx.editor.current_buffer());
        let raw = match &self.status {
            Some(status) => status.clone(),
            None => meta::get(&lines, "status").unwrap_or_default(),
        };
        self.resolved = Some(raw.parse::<Status>()?);
        self.post_type = match current_view(ctx.editor.as_ref()) {
            Some(ViewName::PageEdit) => PostType::Page,
            _ => PostType::Post,
        };
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let status = self.resolved.ok_or(UbError::MissingKey)?;
        let buf = ctx.editor.current_buffer();
        let lines = ctx.editor.lines(buf);
        let syntax = ctx.editor.filetype(buf).parse::<Syntax>()?;
        let html = ctx.converter.convert(
            &meta::body_text(&lines),
            syntax,
            Syntax::Html,
            self.base.encoding,
        )?;

        let content = PostContent {
            title: meta::get(&lines, "title").unwrap_or_default(),
            description: html,
            categories: split_categories(&meta::get(&lines, "categories").unwrap_or_default()),
            tags: meta::get(&lines, "tags").unwrap_or_default(),
            slug: meta::get(&lines, "slug").unwrap_or_default(),
            post_type: self.post_type,
            status: status.to_string(),
        };

        let api = ctx.api()?;
        let post_id = match meta::get_id(&lines, "post_id") {
            Some(post_id) => {
                api.edit_post(post_id, &content, status.is_publish())?;
                tracing::info!("Updated remote item {post_id} as {status}");
                post_id
            }
            None => {
                let post_id = api.new_post(&content, status.is_publish())?;
                tracing::info!("Created remote item {post_id} as {status}");
                post_id
            }
        };
        self.sent = Some(post_id);
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let (Some(post_id), Some(status)) = (self.sent, self.resolved) else {
            return Ok(());
        };

        let buf = ctx.editor.current_buffer();
        let mut lines = ctx.editor.lines(buf);
        let mut changed = false;
        if meta::get_id(&lines, "post_id") != Some(post_id) {
            changed |= meta::set(&mut lines, "post_id", &post_id.to_string());
        }
        if meta::get(&lines, "status").as_deref() != Some(status.as_str()) {
            changed |= meta::set(&mut lines, "status", status.as_str());
        }
        if changed {
            ctx.editor.set_lines(buf, lines);
        }

        let noun = match self.post_type {
            PostType::Post => "Post",
            PostType::Page => "Page",
        };
        ctx.editor.echo(&format!("{noun} sent as {status} !"));
        ctx.events.fire(Event::PostSent(post_id));

        if ctx.settings.options.save_after_sent && ctx.editor.is_modified(buf) {
            execute(Save::new(), ctx)?;
        }
        process_events(ctx);
        Ok(())
    }
}
