//! # Listeners
//!
//! Keep other views consistent after a mutation. A listed view that has
//! focus is refreshed on the spot; any other one is flagged outdated and
//! refreshed when it is entered again.

use std::rc::Rc;

use super::queue::{EventQueue, Listener};
use super::types::{Event, EventKind};
use crate::commands::refresh::refresh_current;
use crate::context::AppContext;
use crate::editor::view::{buffers_matching, set_outdated};
use crate::editor::{BufferId, Editor};
use crate::error::Result;
use crate::models::meta;
use crate::store::Session;

const POST_LISTS: &[&str] = &["post_list", "page_list", "search_result_list"];
const POST_EDITS: &[&str] = &["post_edit", "page_edit"];

/// Register the default listeners in delivery order.
pub fn register_defaults(queue: &mut EventQueue) {
    queue.register(Rc::new(TemplateDeletedListener));
    queue.register(Rc::new(TemplateSavedListener));
    queue.register(Rc::new(LocalPostDeletedListener));
    queue.register(Rc::new(RemotePostDeletedListener));
    queue.register(Rc::new(PostSentListener));
    queue.register(Rc::new(PostSavedListener));
}

/// Every buffer ends up refreshed or flagged. A focused view that fails to
/// refresh is flagged instead, and the first such error is returned once all
/// buffers are handled.
fn refresh_or_flag(ctx: &mut AppContext, buffers: Vec<BufferId>) -> Result<()> {
    let mut failure = None;
    for id in buffers {
        if id == ctx.editor.current_buffer() {
            if let Err(e) = refresh_current(ctx) {
                tracing::warn!("Refreshing buffer {id} failed, flagging it: {e}");
                set_outdated(ctx.editor.as_mut(), id, true);
                failure.get_or_insert(e);
            }
        } else {
            set_outdated(ctx.editor.as_mut(), id, true);
        }
    }
    failure.map_or(Ok(()), Err)
}

fn header_matches(editor: &dyn Editor, id: BufferId, key: &str, value: &str) -> bool {
    meta::get(&editor.lines(id), key).as_deref() == Some(value)
}

fn close_matching(ctx: &mut AppContext, suffixes: &[&str], key: &str, value: &str) {
    let editor: &dyn Editor = ctx.editor.as_ref();
    let doomed: Vec<BufferId> = buffers_matching(editor, suffixes)
        .into_iter()
        .filter(|id| header_matches(editor, *id, key, value))
        .collect();
    for id in doomed {
        tracing::debug!("Closing buffer {id} showing deleted {key} {value}");
        ctx.editor.close_buffer(id);
    }
}

pub struct TemplateDeletedListener;

impl Listener for TemplateDeletedListener {
    fn name(&self) -> &'static str {
        "template-deleted"
    }

    fn kind(&self) -> EventKind {
        EventKind::TemplateDeleted
    }

    fn process_event(&self, event: &Event, ctx: &mut AppContext) -> Result<()> {
        let Event::TemplateDeleted(name) = event else {
            return Ok(());
        };
        let lists = buffers_matching(ctx.editor.as_ref(), &["local_tmpl_list"]);
        refresh_or_flag(ctx, lists)?;
        close_matching(ctx, &["tmpl_edit"], "name", name);
        Ok(())
    }
}

pub struct TemplateSavedListener;

impl Listener for TemplateSavedListener {
    fn name(&self) -> &'static str {
        "template-saved"
    }

    fn kind(&self) -> EventKind {
        EventKind::TemplateSaved
    }

    fn process_event(&self, _event: &Event, ctx: &mut AppContext) -> Result<()> {
        let lists = buffers_matching(ctx.editor.as_ref(), &["local_tmpl_list"]);
        refresh_or_flag(ctx, lists)
    }
}

pub struct LocalPostDeletedListener;

impl Listener for LocalPostDeletedListener {
    fn name(&self) -> &'static str {
        "local-post-deleted"
    }

    fn kind(&self) -> EventKind {
        EventKind::LocalPostDeleted
    }

    fn process_event(&self, event: &Event, ctx: &mut AppContext) -> Result<()> {
        let Event::LocalPostDeleted(id) = event else {
            return Ok(());
        };
        close_matching(ctx, POST_EDITS, "id", &id.to_string());
        let lists = buffers_matching(ctx.editor.as_ref(), POST_LISTS);
        refresh_or_flag(ctx, lists)
    }
}

pub struct RemotePostDeletedListener;

impl Listener for RemotePostDeletedListener {
    fn name(&self) -> &'static str {
        "remote-post-deleted"
    }

    fn kind(&self) -> EventKind {
        EventKind::RemotePostDeleted
    }

    fn process_event(&self, event: &Event, ctx: &mut AppContext) -> Result<()> {
        let Event::RemotePostDeleted(post_id) = event else {
            return Ok(());
        };

        let mut session = Session::open(ctx.store()?)?;
        let cleared = session.db_mut().clear_remote_id(*post_id);
        session.commit()?;
        tracing::info!("Cleared remote id {post_id} from {cleared} local record(s)");
        drop(session);

        let views = buffers_matching(
            ctx.editor.as_ref(),
            &["post_list", "post_edit", "page_list", "page_edit", "search_result_list"],
        );
        refresh_or_flag(ctx, views)
    }
}

pub struct PostSavedListener;

impl Listener for PostSavedListener {
    fn name(&self) -> &'static str {
        "post-saved"
    }

    fn kind(&self) -> EventKind {
        EventKind::PostSaved
    }

    fn process_event(&self, event: &Event, ctx: &mut AppContext) -> Result<()> {
        let Event::PostSaved(id) = event else {
            return Ok(());
        };
        let key = id.to_string();
        let editor: &dyn Editor = ctx.editor.as_ref();
        let edits: Vec<BufferId> = buffers_matching(editor, POST_EDITS)
            .into_iter()
            .filter(|buf| header_matches(editor, *buf, "id", &key))
            .collect();
        refresh_or_flag(ctx, edits)?;

        let lists = buffers_matching(ctx.editor.as_ref(), POST_LISTS);
        refresh_or_flag(ctx, lists)
    }
}

/// Remote listings are only flagged, never refreshed, so sending does not
/// trigger another round trip.
pub struct PostSentListener;

impl Listener for PostSentListener {
    fn name(&self) -> &'static str {
        "post-sent"
    }

    fn kind(&self) -> EventKind {
        EventKind::PostSent
    }

    fn process_event(&self, _event: &Event, ctx: &mut AppContext) -> Result<()> {
        for id in buffers_matching(ctx.editor.as_ref(), &["remote_post_list", "remote_page_list"])
        {
            set_outdated(ctx.editor.as_mut(), id, true);
        }
        Ok(())
    }
}
