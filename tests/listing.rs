mod common;

use common::{blog_settings, harness, harness_with, FakeBlogApi};
use ultrablog::editor::view::{current_view, view_name};
use ultrablog::editor::Editor;
use ultrablog::entry;
use ultrablog::models::{Post, PostType, ViewName};
use ultrablog::remote::RemotePost;
use ultrablog::store::{Database, Store};

fn post(title: &str, content: &str, post_id: Option<i64>, status: &str) -> Post {
    let mut post = Post::new(PostType::Post);
    post.title = title.to_string();
    post.content = content.to_string();
    post.post_id = post_id;
    post.status = status.to_string();
    post
}

fn ids(lines: &[String]) -> Vec<String> {
    lines[1..]
        .iter()
        .filter_map(|l| l.split_whitespace().next().map(str::to_string))
        .collect()
}

fn sample_db() -> Database {
    let mut db = Database::default();
    db.save_post(post("A", "", None, "draft"));
    db.save_post(post("B", "", Some(5), "publish"));
    db.save_post(post("C", "", None, "draft"));
    db.save_post(post("D", "", Some(9), "publish"));
    db
}

#[test]
fn list_should_reject_bad_paging_without_touching_views() {
    let mut h = harness();
    let before = h.ctx.editor.buffers();

    assert!(!entry::list(&mut h.ctx, "post", "local", Some("10"), Some("0")));
    assert!(!entry::list(&mut h.ctx, "post", "local", Some("-1"), Some("1")));

    assert_eq!(
        h.transcript.errors(),
        vec![
            "Invalid paging: page 0 of size 10 !",
            "Invalid paging: page 1 of size -1 !"
        ]
    );
    assert_eq!(h.ctx.editor.buffers(), before);
    assert_eq!(view_name(h.ctx.editor.as_ref(), h.current()), None);
    assert_eq!(h.lines(), vec![String::new()]);
}

#[test]
fn local_list_should_put_unsent_items_first() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());

    assert!(entry::list(&mut h.ctx, "post", "local", None, None));

    let lines = h.lines();
    assert_eq!(
        lines[0],
        "==================== Posts (Page 1) ===================="
    );
    assert_eq!(ids(&lines), vec!["3", "1", "4", "2"]);
    assert_eq!(
        current_view(h.ctx.editor.as_ref()),
        Some(ViewName::LocalPostList)
    );

    let buf = h.current();
    assert!(!h.ctx.editor.is_modifiable(buf));
    assert_eq!(h.ctx.editor.cursor(buf), (2, 0));
    assert_eq!(h.ctx.editor.var(buf, "page_no").as_deref(), Some("1"));
    assert_eq!(
        h.ctx.editor.key_mapping(buf, "<c-pagedown>").as_deref(),
        Some("UBList post local 30 2")
    );
    assert_eq!(
        h.ctx.editor.key_mapping(buf, "<enter>").as_deref(),
        Some("UBOpenUnderCursor cur")
    );
}

#[test]
fn local_list_should_page_through_rows() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());

    assert!(entry::list(&mut h.ctx, "post", "local", Some("3"), Some("2")));
    assert_eq!(ids(&h.lines()), vec!["2"]);

    assert!(!entry::list(&mut h.ctx, "post", "local", Some("3"), Some("3")));
    assert_eq!(h.transcript.errors(), vec!["No more items found !"]);
}

#[test]
fn list_should_treat_huge_page_numbers_as_past_the_end() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());
    let before = h.ctx.editor.buffers();

    assert!(!entry::list(
        &mut h.ctx,
        "post",
        "local",
        Some("10"),
        Some("9223372036854775807")
    ));
    assert!(!entry::find(&mut h.ctx, i64::MAX, &["A"]));

    assert_eq!(
        h.transcript.errors(),
        vec!["No more items found !", "No more items found !"]
    );
    assert_eq!(h.ctx.editor.buffers(), before);
}

#[test]
fn remote_list_should_prefer_local_status() {
    let mut db = Database::default();
    db.save_post(post("Mine", "", Some(100), "draft"));
    let api = FakeBlogApi::new()
        .with_post(RemotePost {
            post_id: 100,
            title: "Mine".to_string(),
            status: "publish".to_string(),
            ..RemotePost::default()
        })
        .with_post(RemotePost {
            post_id: 101,
            title: "Theirs".to_string(),
            status: "publish".to_string(),
            ..RemotePost::default()
        });
    let mut h = harness_with(blog_settings(), db, api);

    assert!(entry::list(&mut h.ctx, "post", "remote", None, None));

    let lines = h.lines();
    assert_eq!(
        lines[0],
        "==================== Recent Posts ===================="
    );
    let rows: Vec<Vec<&str>> = lines[1..]
        .iter()
        .map(|l| l.split_whitespace().collect())
        .collect();
    assert_eq!(rows[0], vec!["0", "101", "publish", "Theirs"]);
    assert_eq!(rows[1], vec!["1", "100", "draft", "Mine"]);
    assert_eq!(h.api.calls(), vec!["recent_posts 10"]);
}

#[test]
fn template_list_should_not_be_remote() {
    let mut h = harness();
    assert!(!entry::list(&mut h.ctx, "tmpl", "remote", None, None));
    assert_eq!(h.transcript.errors(), vec!["Invalid scope: remote !"]);

    assert!(entry::list(&mut h.ctx, "tmpl", "local", None, None));
    assert!(h.lines()[1].starts_with("default"));
}

#[test]
fn find_should_require_every_keyword() {
    let mut db = Database::default();
    db.save_post(post("Rust tips", "borrow checker", None, "draft"));
    db.save_post(post("Vim", "rust plugin", None, "draft"));
    db.save_post(post("Rust and vim", "", Some(3), "publish"));
    let mut h = harness_with(blog_settings(), db, FakeBlogApi::new());

    assert!(entry::find(&mut h.ctx, 1, &["Rust", "vim"]));
    assert_eq!(ids(&h.lines()), vec!["3"]);
    assert_eq!(
        current_view(h.ctx.editor.as_ref()),
        Some(ViewName::SearchResultList)
    );
    assert_eq!(
        h.ctx.editor.var(h.current(), "ub_keywords").as_deref(),
        Some(r#"["Rust","vim"]"#)
    );

    assert!(entry::find(&mut h.ctx, 1, &["rust"]));
    assert_eq!(ids(&h.lines()), vec!["2"]);

    assert!(!entry::find(&mut h.ctx, 1, &["python"]));
    assert_eq!(h.transcript.errors(), vec!["No more items found !"]);
}

#[test]
fn open_under_cursor_should_open_listed_item() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let buf = h.current();
    h.ctx.editor.set_cursor(buf, 3, 0);

    assert!(entry::open_under_cursor(&mut h.ctx, "cur"));
    assert_eq!(current_view(h.ctx.editor.as_ref()), Some(ViewName::PostEdit));
    assert_eq!(h.header("id").as_deref(), Some("1"));
    assert_eq!(h.header("title").as_deref(), Some("A"));
}

#[test]
fn open_under_cursor_should_reject_the_banner_line() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());
    assert!(entry::list(&mut h.ctx, "post", "local", None, None));
    let buf = h.current();
    h.ctx.editor.set_cursor(buf, 1, 0);

    assert!(!entry::open_under_cursor(&mut h.ctx, "cur"));
    assert_eq!(h.transcript.errors(), vec!["Invalid cursor line !"]);
}

#[test]
fn refresh_should_rerun_the_listing() {
    let mut h = harness_with(blog_settings(), sample_db(), FakeBlogApi::new());
    assert!(entry::list(&mut h.ctx, "post", "local", Some("2"), Some("1")));
    let buf = h.current();
    assert_eq!(ids(&h.lines()), vec!["3", "1"]);

    let mut db = h.store.snapshot();
    db.save_post(post("E", "", None, "draft"));
    h.store.persist(&db).unwrap();
    assert!(entry::refresh(&mut h.ctx));
    assert_eq!(h.current(), buf);
    assert_eq!(ids(&h.lines()), vec!["5", "3"]);
}
