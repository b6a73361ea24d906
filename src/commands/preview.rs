//! # Preview
//!
//! Show the current post or page in a browser. With a status word the item
//! is sent first and the blog's own preview is opened; otherwise it is
//! rendered locally through a preview template.

use std::io::Write;

use super::base::{self, CommandBase};
use super::send::SendItem;
use super::{execute, Command};
use crate::context::AppContext;
use crate::editor::view::current_view;
use crate::error::{Result, UbError};
use crate::models::{meta, Syntax, ViewName};

const SEND_FIRST: &[&str] = &["publish", "private", "draft"];

pub struct Preview {
    base: CommandBase,
    template: Option<String>,
    url: Option<String>,
}

impl Preview {
    /// `template` is either a template name or a status to send with.
    pub fn new(template: Option<String>) -> Self {
        Self {
            base: CommandBase::new()
                .view_scopes(&["post_edit", "page_edit"])
                .content_aware(),
            template,
            url: None,
        }
    }

    fn sends_first(&self) -> bool {
        self.template
            .as_deref()
            .is_some_and(|t| SEND_FIRST.contains(&t))
    }
}

/// Fill `%(title)s` and `%(content)s`. `%%` stands for a literal `%`.
pub fn render_template(template: &str, title: &str, content: &str) -> String {
    let mut out = String::with_capacity(template.len() + content.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("%(title)s") {
            out.push_str(title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("%(content)s") {
            out.push_str(content);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("%%") {
            out.push('%');
            rest = after;
        } else {
            out.push('%');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

impl Command for Preview {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        if !self.sends_first() {
            self.base.needs_store = true;
        }
        base::pre_exec(&mut self.base, ctx)
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        if self.sends_first() {
            return Ok(());
        }
        let name = self
            .template
            .clone()
            .unwrap_or_else(|| ctx.settings.options.default_template.clone());
        let template = self
            .base
            .session()?
            .db()
            .template(&name)
            .cloned()
            .ok_or_else(|| UbError::NotFound(format!("Template '{name}' is not found !")))?;

        let buf = ctx.editor.current_buffer();
        let lines = ctx.editor.lines(buf);
        let syntax = ctx.editor.filetype(buf).parse::<Syntax>()?;
        let html = ctx.converter.convert(
            &meta::body_text(&lines),
            syntax,
            Syntax::Html,
            self.base.encoding,
        )?;
        let title = meta::get(&lines, "title").unwrap_or_default();
        let page = render_template(&template.content, &title, &html);

        let mut file = tempfile::Builder::new()
            .prefix("ultrablog-")
            .suffix(".html")
            .tempfile()?;
        let (bytes, _, _) = self.base.encoding.encode(&page);
        file.write_all(&bytes)?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| UbError::Io(e.error))?;
        tracing::debug!("Preview written to {}", path.display());
        self.url = Some(format!("file://{}", path.display()));
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;

        let url = match self.url.take() {
            Some(url) => url,
            None => {
                let status = self.template.clone();
                execute(SendItem::new(status), ctx)?;
                let blog_url = ctx
                    .settings
                    .blog
                    .as_ref()
                    .map(|b| b.url.clone())
                    .unwrap_or_default();
                let lines = ctx.editor.lines(ctx.editor.current_buffer());
                let post_id = meta::get_id(&lines, "post_id").ok_or(UbError::MissingKey)?;
                match current_view(ctx.editor.as_ref()) {
                    Some(ViewName::PageEdit) => {
                        format!("{blog_url}?pageid={post_id}&preview=true")
                    }
                    _ => format!("{blog_url}?p={post_id}&preview=true"),
                }
            }
        };
        ctx.editor.open_url(&url)
    }
}
