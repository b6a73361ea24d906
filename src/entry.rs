//! # Entry Points
//!
//! What the host calls. Each entry point parses its string arguments, runs
//! one command and reports the outcome to the editor. Errors never escape:
//! a declined confirmation is echoed as a message and anything else goes to
//! the editor's error stream. The boolean result tells whether the command
//! succeeded.

use crate::commands::{
    self, execute, BlogThis, Convert, Delete, DeleteUnderCursor, Find, List, New, Open,
    OpenUnderCursor, Preview, Refresh, Save, SendItem, UploadMedia,
};
use crate::context::AppContext;
use crate::editor::Placement;
use crate::error::{Result, UbError};
use crate::models::{ItemType, Scope};

fn guarded<F>(ctx: &mut AppContext, name: &str, f: F) -> bool
where
    F: FnOnce(&mut AppContext) -> Result<()>,
{
    match f(ctx) {
        Ok(()) => true,
        Err(UbError::Declined(message)) => {
            tracing::debug!("{name} declined");
            ctx.editor.echo(&message);
            false
        }
        Err(e) => {
            tracing::error!("{name} failed: {e}");
            ctx.editor.echo_error(&e.report());
            false
        }
    }
}

fn parse_number(raw: Option<&str>, default: Option<i64>) -> Result<Option<i64>> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| UbError::InvalidPaging {
                page_no: 0,
                page_size: 0,
            }),
    }
}

pub fn list(
    ctx: &mut AppContext,
    item_type: &str,
    scope: &str,
    page_size: Option<&str>,
    page_no: Option<&str>,
) -> bool {
    guarded(ctx, "list", |ctx| {
        let item_type = item_type.parse::<ItemType>()?;
        let scope = scope.parse::<Scope>()?;
        let page_size = parse_number(page_size, None)?;
        let page_no = parse_number(page_no, Some(1))?.unwrap_or(1);
        execute(List::new(item_type, scope, page_size, page_no), ctx)
    })
}

pub fn find(ctx: &mut AppContext, page_no: i64, keywords: &[&str]) -> bool {
    guarded(ctx, "find", |ctx| {
        let keywords = keywords.iter().map(|k| k.to_string()).collect();
        execute(Find::new(page_no, keywords), ctx)
    })
}

pub fn refresh(ctx: &mut AppContext) -> bool {
    guarded(ctx, "refresh", |ctx| execute(Refresh::new(), ctx))
}

pub fn preview(ctx: &mut AppContext, template: Option<&str>) -> bool {
    guarded(ctx, "preview", |ctx| {
        execute(Preview::new(template.map(str::to_string)), ctx)
    })
}

pub fn save(ctx: &mut AppContext) -> bool {
    guarded(ctx, "save", |ctx| execute(Save::new(), ctx))
}

pub fn send(ctx: &mut AppContext, status: Option<&str>) -> bool {
    guarded(ctx, "send", |ctx| {
        execute(SendItem::new(status.map(str::to_string)), ctx)
    })
}

pub fn open(
    ctx: &mut AppContext,
    item_type: &str,
    key: &str,
    scope: &str,
    placement: &str,
) -> bool {
    guarded(ctx, "open", |ctx| {
        let item_type = item_type.parse::<ItemType>()?;
        let scope = scope.parse::<Scope>()?;
        let placement = placement.parse::<Placement>()?;
        execute(Open::new(item_type, key, scope, placement), ctx)
    })
}

pub fn open_under_cursor(ctx: &mut AppContext, placement: &str) -> bool {
    guarded(ctx, "open-under-cursor", |ctx| {
        let placement = placement.parse::<Placement>()?;
        execute(OpenUnderCursor::new(placement), ctx)
    })
}

pub fn delete(ctx: &mut AppContext, item_type: &str, key: &str, scope: &str) -> bool {
    guarded(ctx, "delete", |ctx| {
        let item_type = item_type.parse::<ItemType>()?;
        let scope = scope.parse::<Scope>()?;
        execute(Delete::new(item_type, key, scope), ctx)
    })
}

pub fn delete_under_cursor(ctx: &mut AppContext) -> bool {
    guarded(ctx, "delete-under-cursor", |ctx| {
        execute(DeleteUnderCursor::new(), ctx)
    })
}

pub fn upload_media(ctx: &mut AppContext, path: &str) -> bool {
    guarded(ctx, "upload-media", |ctx| execute(UploadMedia::new(path), ctx))
}

pub fn blog_this(ctx: &mut AppContext, item_type: &str, syntax: Option<&str>) -> bool {
    guarded(ctx, "blog-this", |ctx| {
        let item_type = item_type.parse::<ItemType>()?;
        execute(BlogThis::new(item_type, syntax.map(str::to_string)), ctx)
    })
}

pub fn convert(ctx: &mut AppContext, to: &str, from: Option<&str>) -> bool {
    guarded(ctx, "convert", |ctx| {
        execute(Convert::new(to, from.map(str::to_string)), ctx)
    })
}

pub fn new_item(ctx: &mut AppContext, item_type: &str, mixed: &str) -> bool {
    guarded(ctx, "new", |ctx| {
        let item_type = item_type.parse::<ItemType>()?;
        execute(New::new(item_type, mixed), ctx)
    })
}

pub fn on_buffer_enter(ctx: &mut AppContext) -> bool {
    guarded(ctx, "buffer-enter", commands::on_buffer_enter)
}

/// Run one ex command line such as `UBList post local` or `UBSend publish`.
///
/// Returns `Ok(false)` when the line is not an UltraBlog command.
pub fn run_ex_command(ctx: &mut AppContext, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(false);
    };
    let args: Vec<&str> = parts.collect();
    let arg = |idx: usize| args.get(idx).copied();

    tracing::debug!("Ex command {command} {args:?}");
    match command {
        "UBList" => {
            list(
                ctx,
                arg(0).unwrap_or("post"),
                arg(1).unwrap_or("local"),
                arg(2),
                arg(3),
            );
        }
        "UBFind" => {
            let (page_no, keywords) = match args.split_first() {
                Some((first, rest)) if !rest.is_empty() => match first.parse::<i64>() {
                    Ok(page_no) => (page_no, rest),
                    Err(_) => (1, &args[..]),
                },
                _ => (1, &args[..]),
            };
            find(ctx, page_no, keywords);
        }
        "UBRefresh" => {
            refresh(ctx);
        }
        "UBPreview" => {
            preview(ctx, arg(0));
        }
        "UBSave" => {
            save(ctx);
        }
        "UBSend" => {
            send(ctx, arg(0));
        }
        "UBOpen" => match arg(1) {
            Some(key) => {
                open(
                    ctx,
                    arg(0).unwrap_or("post"),
                    key,
                    arg(2).unwrap_or("local"),
                    arg(3).unwrap_or("cur"),
                );
            }
            None => ctx.editor.echo_error("Usage: UBOpen <type> <key> [scope] [view]"),
        },
        "UBOpenUnderCursor" => {
            open_under_cursor(ctx, arg(0).unwrap_or("cur"));
        }
        "UBDel" => match arg(1) {
            Some(key) => {
                delete(ctx, arg(0).unwrap_or("post"), key, arg(2).unwrap_or("local"));
            }
            None => ctx.editor.echo_error("Usage: UBDel <type> <key> [scope]"),
        },
        "UBDelUnderCursor" => {
            delete_under_cursor(ctx);
        }
        "UBUpload" => match arg(0) {
            Some(_) => {
                upload_media(ctx, &args.join(" "));
            }
            None => ctx.editor.echo_error("Usage: UBUpload <file>"),
        },
        "UBThis" => {
            blog_this(ctx, arg(0).unwrap_or("post"), arg(1));
        }
        "UBConv" => match arg(0) {
            Some(to) => {
                convert(ctx, to, arg(1));
            }
            None => ctx.editor.echo_error("Usage: UBConv <to> [from]"),
        },
        "UBNew" => {
            new_item(ctx, arg(0).unwrap_or("post"), arg(1).unwrap_or("markdown"));
        }
        _ => return Ok(false),
    }
    Ok(true)
}
