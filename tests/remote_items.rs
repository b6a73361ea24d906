mod common;

use std::fs;

use common::{blog_settings, harness, harness_with, FakeBlogApi};
use ultrablog::editor::Editor;
use ultrablog::entry;
use ultrablog::models::{Post, PostType};
use ultrablog::remote::RemotePost;
use ultrablog::store::Database;

fn remote_post() -> RemotePost {
    RemotePost {
        post_id: 7,
        title: "Remote".to_string(),
        description: "<p>Hi</p>".to_string(),
        categories: vec!["a".to_string(), "b".to_string()],
        tags: "t".to_string(),
        slug: "remote".to_string(),
        status: "publish".to_string(),
    }
}

#[test]
fn remote_open_should_store_copy_when_configured() {
    let mut settings = blog_settings();
    settings.options.save_after_opened = true;
    let api = FakeBlogApi::new().with_post(remote_post());
    let mut h = harness_with(settings, Database::default(), api);

    assert!(entry::open(&mut h.ctx, "post", "7", "remote", "cur"));

    assert_eq!(h.api.calls(), vec!["get_post 7"]);
    assert_eq!(h.header("id").as_deref(), Some("1"));
    assert_eq!(h.header("post_id").as_deref(), Some("7"));
    assert_eq!(h.header("categories").as_deref(), Some("a, b"));
    assert_eq!(h.ctx.editor.filetype(h.current()), "html");
    assert!(!h.is_modified());

    let db = h.store.snapshot();
    let local = db.post_by_remote_id(7, Some(PostType::Post)).unwrap();
    assert_eq!(local.title, "Remote");
    assert_eq!(local.content, "<p>Hi</p>");
}

#[test]
fn remote_open_should_leave_transient_copy_modified() {
    let api = FakeBlogApi::new().with_post(remote_post());
    let mut h = harness_with(blog_settings(), Database::default(), api);

    assert!(entry::open(&mut h.ctx, "post", "7", "remote", "cur"));

    assert_eq!(h.header("id").as_deref(), Some("0"));
    assert!(h.is_modified());
    assert_eq!(h.store.writes(), 0);
    assert_eq!(h.lines().last().map(String::as_str), Some("<p>Hi</p>"));
}

#[test]
fn remote_open_should_prefer_local_copy() {
    let mut db = Database::default();
    let mut post = Post::new(PostType::Post);
    post.title = "Cached".to_string();
    post.post_id = Some(7);
    db.save_post(post);
    let api = FakeBlogApi::new().with_post(remote_post());
    let mut h = harness_with(blog_settings(), db, api);

    assert!(entry::open(&mut h.ctx, "post", "7", "remote", "cur"));

    assert!(h.api.calls().is_empty());
    assert_eq!(h.header("title").as_deref(), Some("Cached"));
}

#[test]
fn remote_open_should_report_server_faults() {
    let mut h = harness();
    assert!(!entry::open(&mut h.ctx, "page", "3", "remote", "cur"));
    assert_eq!(h.transcript.errors(), vec!["xmlrpc error: Invalid post ID."]);
}

#[test]
fn preview_should_render_through_template() {
    let mut h = harness();
    assert!(entry::new_item(&mut h.ctx, "post", "markdown"));
    h.set_header("title", "Hello");
    h.set_body(&["World"]);

    assert!(entry::preview(&mut h.ctx, None));

    let urls = h.transcript.urls();
    assert_eq!(urls.len(), 1);
    let path = urls[0].strip_prefix("file://").unwrap();
    assert!(path.ends_with(".html"));
    let page = fs::read_to_string(path).unwrap();
    fs::remove_file(path).unwrap();
    assert!(page.contains("<title>Hello</title>"));
    assert!(page.contains("<p>World</p>"));
    assert_eq!(h.api.count("new_post"), 0);
}

#[test]
fn preview_should_report_unknown_template() {
    let mut h = harness();
    assert!(entry::new_item(&mut h.ctx, "post", "markdown"));

    assert!(!entry::preview(&mut h.ctx, Some("fancy")));
    assert_eq!(h.transcript.errors(), vec!["Template 'fancy' is not found !"]);
    assert!(h.transcript.urls().is_empty());
}

#[test]
fn preview_with_status_should_send_first() {
    let mut h = harness();
    assert!(entry::new_item(&mut h.ctx, "page", "markdown"));
    h.set_header("title", "About");

    assert!(entry::preview(&mut h.ctx, Some("draft")));

    assert_eq!(h.api.count("new_post false"), 1);
    assert_eq!(
        h.transcript.urls(),
        vec!["http://blog.example.com/?pageid=100&preview=true"]
    );
}

#[test]
fn upload_should_insert_link_below_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("a.png");
    fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    let mut h = harness();
    assert!(entry::new_item(&mut h.ctx, "post", "markdown"));
    let buf = h.current();
    h.ctx.editor.set_cursor(buf, 9, 0);

    assert!(entry::upload_media(&mut h.ctx, image.to_str().unwrap()));

    assert_eq!(h.api.calls().last().unwrap(), "new_media_object a.png");
    let lines = h.lines();
    assert_eq!(
        &lines[9..],
        [
            "![a.png][]",
            "[a.png]:http://blog.example.com/uploads/a.png"
        ]
    );
}

#[test]
fn upload_should_reject_missing_files() {
    let mut h = harness();
    assert!(entry::new_item(&mut h.ctx, "post", "markdown"));

    assert!(!entry::upload_media(&mut h.ctx, "/nonexistent/x.png"));
    assert_eq!(
        h.transcript.errors(),
        vec!["File not exists: /nonexistent/x.png !"]
    );
    assert_eq!(h.api.count("new_media_object"), 0);
}

#[test]
fn new_post_should_fall_back_to_configured_categories() {
    let api = FakeBlogApi::new().failing_categories();
    let mut h = harness_with(blog_settings(), Database::default(), api);

    assert!(entry::new_item(&mut h.ctx, "post", "markdown"));
    assert_eq!(h.header("categories").as_deref(), Some("configured"));
    assert!(h.transcript.errors().is_empty());
}

#[test]
fn new_post_should_append_promotion_link_when_enabled() {
    let mut settings = blog_settings();
    settings.options.append_promotion_link = true;
    let mut h = harness_with(settings, Database::default(), FakeBlogApi::new());

    assert!(entry::new_item(&mut h.ctx, "post", "html"));
    let last = h.lines().last().cloned().unwrap();
    assert!(last.starts_with("Posted via <a href=\""));
}
