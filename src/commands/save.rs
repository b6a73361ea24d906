//! # Save
//!
//! Write the current edit view back to the local store.

use super::base::{self, CommandBase};
use super::Command;
use crate::context::AppContext;
use crate::editor::view::current_view;
use crate::error::{Result, UbError};
use crate::events::{process_events, Event};
use crate::models::{check_reserved_word, meta, Post, PostType, Template, ViewName};

enum Saved {
    Post(i64),
    Template(String),
}

pub struct Save {
    base: CommandBase,
    saved: Option<Saved>,
}

impl Default for Save {
    fn default() -> Self {
        Self::new()
    }
}

impl Save {
    pub fn new() -> Self {
        Self {
            base: CommandBase::new()
                .view_scopes(&["post_edit", "page_edit", "tmpl_edit"])
                .needs_store(),
            saved: None,
        }
    }
}

fn text(lines: &[String], key: &str) -> String {
    meta::get(lines, key).unwrap_or_default()
}

fn post_from_buffer(
    mut post: Post,
    post_type: PostType,
    lines: &[String],
    syntax: String,
) -> Post {
    post.post_type = post_type;
    post.post_id = meta::get_id(lines, "post_id");
    post.title = text(lines, "title");
    if post_type == PostType::Post {
        post.categories = text(lines, "categories");
        post.tags = text(lines, "tags");
    }
    post.slug = text(lines, "slug");
    post.status = meta::get(lines, "status")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "draft".to_string());
    post.content = meta::body_text(lines);
    if !syntax.is_empty() {
        post.syntax = syntax;
    }
    post
}

impl Command for Save {
    fn name(&self) -> &'static str {
        "save"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        if !ctx.editor.is_modified(ctx.editor.current_buffer()) {
            return Err(UbError::NotModified);
        }
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let buf = ctx.editor.current_buffer();
        let lines = ctx.editor.lines(buf);
        let view = current_view(ctx.editor.as_ref()).ok_or(UbError::InvalidView)?;
        let db = self.base.session_mut()?.db_mut();

        let saved = match view {
            ViewName::PostEdit | ViewName::PageEdit => {
                let post_type = if view == ViewName::PostEdit {
                    PostType::Post
                } else {
                    PostType::Page
                };
                let existing = meta::get_id(&lines, "id")
                    .and_then(|id| db.post(id, Some(post_type)).cloned())
                    .unwrap_or_else(|| Post::new(post_type));
                let post =
                    post_from_buffer(existing, post_type, &lines, ctx.editor.filetype(buf));
                let id = db.save_post(post);
                tracing::info!("Saved {post_type:?} {id}");
                Saved::Post(id)
            }
            ViewName::TmplEdit => {
                let name = meta::get(&lines, "name")
                    .filter(|n| !n.is_empty())
                    .ok_or(UbError::MissingKey)?;
                check_reserved_word(&name)?;
                let mut template = db.template(&name).cloned().unwrap_or(Template {
                    name: name.clone(),
                    description: String::new(),
                    content: String::new(),
                });
                template.description = text(&lines, "description");
                template.content = meta::body_text(&lines);
                db.save_template(template);
                tracing::info!("Saved template {name}");
                Saved::Template(name)
            }
            _ => return Err(UbError::InvalidView),
        };
        self.saved = Some(saved);
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let buf = ctx.editor.current_buffer();
        match self.saved.take() {
            Some(Saved::Post(id)) => {
                let mut lines = ctx.editor.lines(buf);
                if meta::set(&mut lines, "id", &id.to_string()) {
                    ctx.editor.set_lines(buf, lines);
                }
                ctx.editor.set_modified(buf, false);
                ctx.events.fire(Event::PostSaved(id));
            }
            Some(Saved::Template(name)) => {
                ctx.editor.set_modified(buf, false);
                ctx.events.fire(Event::TemplateSaved(name));
            }
            None => return Ok(()),
        }
        process_events(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn post_from_buffer_should_copy_header_and_body() {
        let buffer = lines(&[
            "<!--",
            "$id:              0",
            "$post_id:         0",
            "$title:           Hello",
            "$categories:      a, b",
            "$tags:            t",
            "$slug:            hello",
            "$status:          ",
            "-->",
            "World",
            "",
        ]);
        let post = post_from_buffer(
            Post::new(PostType::Post),
            PostType::Post,
            &buffer,
            "html".to_string(),
        );
        assert_eq!(post.title, "Hello");
        assert_eq!(post.categories, "a, b");
        assert_eq!(post.post_id, None);
        assert_eq!(post.status, "draft");
        assert_eq!(post.content, "World\n");
        assert_eq!(post.syntax, "html");
    }

    #[test]
    fn post_from_buffer_should_ignore_categories_for_pages() {
        let buffer = lines(&[
            "<!--",
            "$id:              2",
            "$post_id:         9",
            "$title:           About",
            "$slug:            about",
            "$status:          publish",
            "-->",
        ]);
        let post = post_from_buffer(Post::new(PostType::Page), PostType::Page, &buffer, String::new());
        assert_eq!(post.post_id, Some(9));
        assert_eq!(post.categories, "");
        assert_eq!(post.syntax, "markdown");
        assert_eq!(post.content, "");
    }
}
