mod common;

use common::{blog_settings, harness_with, FakeBlogApi, Harness, Recorder};
use ultrablog::editor::view::{current_view, is_outdated};
use ultrablog::editor::Editor;
use ultrablog::entry;
use ultrablog::models::{Post, PostType, ViewName};
use ultrablog::store::Database;

fn post(title: &str, post_id: Option<i64>) -> Post {
    let mut post = Post::new(PostType::Post);
    post.title = title.to_string();
    post.post_id = post_id;
    post
}

fn setup() -> Harness {
    let mut db = Database::default();
    db.save_post(post("A", None));
    db.save_post(post("B", Some(5)));
    db.save_post(post("C", None));
    db.save_post(post("D", Some(9)));
    harness_with(blog_settings(), db, FakeBlogApi::new())
}

fn listed_ids(h: &Harness, buf: usize) -> Vec<String> {
    h.ctx.editor.lines(buf)[1..]
        .iter()
        .filter_map(|l| l.split_whitespace().next().map(str::to_string))
        .collect()
}

#[test]
fn declined_delete_should_change_nothing() {
    let mut h = setup();
    let recorder = Recorder::attach(&mut h.ctx);
    h.transcript.answer(false);

    assert!(!entry::delete(&mut h.ctx, "post", "1", "local"));

    assert_eq!(
        h.transcript.prompts(),
        vec!["Are you sure to delete local post \"A\" ?"]
    );
    assert_eq!(
        h.transcript.messages(),
        vec!["Deletion of local post \"A\" cancelled !"]
    );
    assert!(h.transcript.errors().is_empty());
    assert_eq!(h.store.writes(), 0);
    assert!(h.store.snapshot().post(1, None).is_some());
    assert!(recorder.seen().is_empty());
}

#[test]
fn delete_of_missing_item_should_fail_before_prompting() {
    let mut h = setup();
    h.transcript.answer(true);

    assert!(!entry::delete(&mut h.ctx, "post", "42", "local"));

    assert!(h.transcript.prompts().is_empty());
    assert_eq!(h.transcript.errors(), vec!["No post found: 42 !"]);
    assert_eq!(h.store.writes(), 0);
}

#[test]
fn local_delete_should_close_matching_editors_and_flag_lists() {
    let mut h = setup();
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let list = h.current();
    assert!(entry::open(&mut h.ctx, "post", "1", "local", "split"));
    let doomed = h.current();
    assert!(entry::open(&mut h.ctx, "post", "3", "local", "split"));
    let other = h.current();

    h.transcript.answer(true);
    assert!(entry::delete(&mut h.ctx, "post", "1", "local"));

    let buffers = h.ctx.editor.buffers();
    assert!(!buffers.contains(&doomed));
    assert!(buffers.contains(&other));
    assert_eq!(h.header("id").as_deref(), Some("3"));
    assert!(is_outdated(h.ctx.editor.as_ref(), list));
    assert!(h.store.snapshot().post(1, None).is_none());
    assert_eq!(h.transcript.messages(), vec!["Local post \"A\" was deleted !"]);

    h.ctx.editor.set_current_buffer(list).unwrap();
    assert!(entry::on_buffer_enter(&mut h.ctx));
    assert!(!is_outdated(h.ctx.editor.as_ref(), list));
    assert_eq!(listed_ids(&h, list), vec!["3", "4", "2"]);
}

#[test]
fn local_delete_should_refresh_focused_list() {
    let mut h = setup();
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let list = h.current();

    h.transcript.answer(true);
    assert!(entry::delete(&mut h.ctx, "post", "3", "local"));

    assert_eq!(h.current(), list);
    assert!(!is_outdated(h.ctx.editor.as_ref(), list));
    assert_eq!(listed_ids(&h, list), vec!["1", "4", "2"]);
}

#[test]
fn remote_delete_should_forget_remote_id_locally() {
    let mut h = setup();
    h.transcript.answer(true);

    assert!(entry::delete(&mut h.ctx, "post", "9", "remote"));

    assert_eq!(h.api.calls(), vec!["delete_post 9"]);
    let db = h.store.snapshot();
    let local = db.post(4, None).unwrap();
    assert_eq!(local.post_id, None);
    assert_eq!(local.title, "D");
}

#[test]
fn remote_page_delete_should_use_page_call() {
    let mut h = setup();
    h.transcript.answer(true);

    assert!(entry::delete(&mut h.ctx, "page", "12", "remote"));
    assert_eq!(h.api.calls(), vec!["delete_page 12"]);
}

#[test]
fn delete_under_cursor_should_confirm_each_copy() {
    let mut h = setup();
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let list = h.current();
    // Rows: 3, 1, 4, 2. Line 5 is B, local 2 and remote 5.
    h.ctx.editor.set_cursor(list, 5, 0);

    h.transcript.answer(false);
    h.transcript.answer(true);
    assert!(entry::delete_under_cursor(&mut h.ctx));

    assert_eq!(h.transcript.prompts().len(), 2);
    assert_eq!(
        h.transcript.messages()[0],
        "Deletion of local post \"B\" cancelled !"
    );
    assert!(h.store.snapshot().post(2, None).is_some());
    assert_eq!(h.api.calls(), vec!["delete_post 5"]);
    assert_eq!(h.store.snapshot().post(2, None).unwrap().post_id, None);
    assert_eq!(current_view(h.ctx.editor.as_ref()), Some(ViewName::LocalPostList));
}

#[test]
fn emptied_focused_search_should_not_stop_other_lists_being_flagged() {
    let mut h = setup();
    assert!(entry::find(&mut h.ctx, 1, &["A"]));
    let search = h.current();
    assert!(entry::open(&mut h.ctx, "post", "1", "local", "split"));
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let list = h.current();
    assert_ne!(list, search);

    h.ctx.editor.set_current_buffer(search).unwrap();
    h.transcript.answer(true);
    assert!(entry::delete(&mut h.ctx, "post", "1", "local"));

    assert!(h.store.snapshot().post(1, None).is_none());
    assert_eq!(h.transcript.errors(), vec!["No more items found !"]);
    assert!(is_outdated(h.ctx.editor.as_ref(), search));
    assert!(is_outdated(h.ctx.editor.as_ref(), list));

    h.ctx.editor.set_current_buffer(list).unwrap();
    assert!(entry::on_buffer_enter(&mut h.ctx));
    assert_eq!(listed_ids(&h, list), vec!["3", "4", "2"]);
}
