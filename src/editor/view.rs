//! # Views
//!
//! A view is a buffer tagged with a view name. Helpers here open, find and
//! flag views on top of any [`Editor`].

use super::{BufferId, Editor, Placement};
use crate::models::ViewName;

/// Buffer variable holding the view name.
pub const VIEW_NAME_VAR: &str = "ub_view_name";

/// Buffer variable set to `1` when the view needs a refresh.
pub const OUTDATED_VAR: &str = "ub_view_is_outdated";

/// Open a view, reusing the current buffer when it is an unnamed,
/// unmodified scratch buffer and no split or tab was asked for.
pub fn wise_open(editor: &mut dyn Editor, view: ViewName, placement: Placement) -> BufferId {
    let current = editor.current_buffer();
    let id = match placement {
        Placement::Current
            if editor.buffer_name(current).is_none() && !editor.is_modified(current) =>
        {
            editor.clear_buffer(current);
            current
        }
        Placement::Current => editor.open_buffer(Placement::Split),
        other => editor.open_buffer(other),
    };
    editor.set_var(id, VIEW_NAME_VAR, view.as_str().to_string());
    tracing::debug!("Buffer {id} now shows {view}");
    id
}

pub fn view_name(editor: &dyn Editor, id: BufferId) -> Option<ViewName> {
    editor
        .var(id, VIEW_NAME_VAR)
        .and_then(|name| name.parse::<ViewName>().ok())
}

pub fn current_view(editor: &dyn Editor) -> Option<ViewName> {
    view_name(editor, editor.current_buffer())
}

pub fn is_view(editor: &dyn Editor, id: BufferId, view: ViewName) -> bool {
    view_name(editor, id) == Some(view)
}

/// Buffers whose view name ends with any of the suffixes.
pub fn buffers_matching(editor: &dyn Editor, suffixes: &[&str]) -> Vec<BufferId> {
    editor
        .buffers()
        .into_iter()
        .filter(|id| {
            view_name(editor, *id)
                .map(|view| suffixes.iter().any(|s| view.matches_suffix(s)))
                .unwrap_or(false)
        })
        .collect()
}

pub fn set_outdated(editor: &mut dyn Editor, id: BufferId, outdated: bool) {
    if outdated {
        editor.set_var(id, OUTDATED_VAR, "1".to_string());
    } else {
        editor.unset_var(id, OUTDATED_VAR);
    }
}

pub fn is_outdated(editor: &dyn Editor, id: BufferId) -> bool {
    editor.var(id, OUTDATED_VAR).as_deref() == Some("1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::MemoryEditor;

    #[test]
    fn wise_open_should_reuse_unmodified_scratch_buffer() {
        let mut editor = MemoryEditor::new();
        let id = wise_open(&mut editor, ViewName::LocalPostList, Placement::Current);
        assert_eq!(id, 1);
        assert!(is_view(&editor, 1, ViewName::LocalPostList));
    }

    #[test]
    fn wise_open_should_split_when_current_is_modified() {
        let mut editor = MemoryEditor::new();
        editor.set_lines(1, vec!["draft".to_string()]);
        let id = wise_open(&mut editor, ViewName::PostEdit, Placement::Current);
        assert_ne!(id, 1);
        assert_eq!(editor.current_buffer(), id);
        assert_eq!(editor.lines(1), vec!["draft".to_string()]);
    }

    #[test]
    fn wise_open_should_split_when_current_is_named() {
        let mut editor = MemoryEditor::new();
        editor.set_buffer_name(1, "notes.md");
        let id = wise_open(&mut editor, ViewName::PostEdit, Placement::Current);
        assert_ne!(id, 1);
    }

    #[test]
    fn wise_open_should_reset_outdated_flag_on_reuse() {
        let mut editor = MemoryEditor::new();
        wise_open(&mut editor, ViewName::LocalPostList, Placement::Current);
        set_outdated(&mut editor, 1, true);
        wise_open(&mut editor, ViewName::LocalPostList, Placement::Current);
        assert!(!is_outdated(&editor, 1));
    }

    #[test]
    fn buffers_matching_should_filter_by_suffix() {
        let mut editor = MemoryEditor::new();
        wise_open(&mut editor, ViewName::LocalPostList, Placement::Current);
        let remote = wise_open(&mut editor, ViewName::RemotePostList, Placement::Split);
        let edit = wise_open(&mut editor, ViewName::PostEdit, Placement::Tab);
        editor.open_buffer(Placement::Split);

        assert_eq!(buffers_matching(&editor, &["post_list"]), vec![1, remote]);
        assert_eq!(buffers_matching(&editor, &["remote_post_list"]), vec![remote]);
        assert_eq!(buffers_matching(&editor, &["post_edit", "list"]), vec![1, remote, edit]);
    }
}
