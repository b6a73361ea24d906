//! Shared fixtures for the integration tests: a scripted blog API and
//! context builders over the in-memory editor and store.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ultrablog::config::{BlogSettings, Settings};
use ultrablog::editor::{BufferId, Editor, MemoryEditor, Transcript};
use ultrablog::error::{Result, UbError};
use ultrablog::events::{Event, EventKind, Listener};
use ultrablog::models::meta;
use ultrablog::remote::{BlogApi, MediaFile, MediaObject, PostContent, RemotePost, RemoteSummary};
use ultrablog::store::{Database, MemoryStore};
use ultrablog::AppContext;

/// Blog double that records every call and keeps sent posts in memory.
#[derive(Default)]
pub struct FakeBlogApi {
    calls: RefCell<Vec<String>>,
    posts: RefCell<Vec<RemotePost>>,
    next_id: Cell<i64>,
    categories: Vec<String>,
    fail_categories: bool,
}

impl FakeBlogApi {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(100),
            categories: vec!["rust".to_string(), "vim".to_string()],
            ..Self::default()
        }
    }

    pub fn failing_categories(mut self) -> Self {
        self.fail_categories = true;
        self
    }

    pub fn with_post(self, post: RemotePost) -> Self {
        self.posts.borrow_mut().push(post);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn post(&self, post_id: i64) -> Option<RemotePost> {
        self.posts
            .borrow()
            .iter()
            .find(|p| p.post_id == post_id)
            .cloned()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn remote(post_id: i64, content: &PostContent) -> RemotePost {
        RemotePost {
            post_id,
            title: content.title.clone(),
            description: content.description.clone(),
            categories: content.categories.clone(),
            tags: content.tags.clone(),
            slug: content.slug.clone(),
            status: content.status.clone(),
        }
    }

    fn lookup(&self, post_id: i64) -> Result<RemotePost> {
        self.post(post_id).ok_or(UbError::Fault {
            code: 404,
            message: "Invalid post ID.".to_string(),
        })
    }

    fn summaries(&self) -> Vec<RemoteSummary> {
        self.posts
            .borrow()
            .iter()
            .rev()
            .map(|p| RemoteSummary {
                post_id: p.post_id,
                title: p.title.clone(),
                status: p.status.clone(),
            })
            .collect()
    }
}

impl BlogApi for FakeBlogApi {
    fn new_post(&self, content: &PostContent, publish: bool) -> Result<i64> {
        let post_id = self.next_id.get();
        self.next_id.set(post_id + 1);
        self.record(format!("new_post {publish}"));
        self.posts.borrow_mut().push(Self::remote(post_id, content));
        Ok(post_id)
    }

    fn edit_post(&self, post_id: i64, content: &PostContent, publish: bool) -> Result<()> {
        self.record(format!("edit_post {post_id} {publish}"));
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.post_id == post_id) {
            Some(existing) => *existing = Self::remote(post_id, content),
            None => posts.push(Self::remote(post_id, content)),
        }
        Ok(())
    }

    fn delete_post(&self, post_id: i64) -> Result<()> {
        self.record(format!("delete_post {post_id}"));
        self.posts.borrow_mut().retain(|p| p.post_id != post_id);
        Ok(())
    }

    fn delete_page(&self, page_id: i64) -> Result<()> {
        self.record(format!("delete_page {page_id}"));
        self.posts.borrow_mut().retain(|p| p.post_id != page_id);
        Ok(())
    }

    fn get_post(&self, post_id: i64) -> Result<RemotePost> {
        self.record(format!("get_post {post_id}"));
        self.lookup(post_id)
    }

    fn get_page(&self, page_id: i64) -> Result<RemotePost> {
        self.record(format!("get_page {page_id}"));
        self.lookup(page_id)
    }

    fn recent_posts(&self, count: usize) -> Result<Vec<RemoteSummary>> {
        self.record(format!("recent_posts {count}"));
        Ok(self.summaries().into_iter().take(count).collect())
    }

    fn pages(&self) -> Result<Vec<RemoteSummary>> {
        self.record("pages".to_string());
        Ok(self.summaries())
    }

    fn categories(&self) -> Result<Vec<String>> {
        self.record("categories".to_string());
        if self.fail_categories {
            return Err(UbError::Fault {
                code: 403,
                message: "Bad login/pass combination.".to_string(),
            });
        }
        Ok(self.categories.clone())
    }

    fn new_media_object(&self, media: &MediaFile) -> Result<MediaObject> {
        self.record(format!("new_media_object {}", media.name));
        Ok(MediaObject {
            file: media.name.clone(),
            url: format!("http://blog.example.com/uploads/{}", media.name),
        })
    }
}

/// Everything a test needs to drive and inspect one context.
pub struct Harness {
    pub ctx: AppContext,
    pub store: Rc<MemoryStore>,
    pub api: Rc<FakeBlogApi>,
    pub transcript: Transcript,
}

pub fn blog_settings() -> Settings {
    Settings {
        blog: Some(BlogSettings {
            login_name: "admin".to_string(),
            password: "secret".to_string(),
            url: "http://blog.example.com/".to_string(),
            xmlrpc_uri: "xmlrpc.php".to_string(),
            db_path: "ultrablog.json".into(),
            categories: "configured".to_string(),
        }),
        ..Settings::default()
    }
}

pub fn harness_with(settings: Settings, db: Database, api: FakeBlogApi) -> Harness {
    let editor = MemoryEditor::new();
    let transcript = editor.transcript();
    let store = Rc::new(MemoryStore::with_database(db));
    let api = Rc::new(api);
    let ctx = AppContext::new(settings, Box::new(editor))
        .with_store(store.clone())
        .with_api(api.clone());
    Harness {
        ctx,
        store,
        api,
        transcript,
    }
}

pub fn harness() -> Harness {
    let mut db = Database::default();
    db.ensure_default_template();
    harness_with(blog_settings(), db, FakeBlogApi::new())
}

impl Harness {
    pub fn current(&self) -> BufferId {
        self.ctx.editor.current_buffer()
    }

    pub fn lines(&self) -> Vec<String> {
        self.ctx.editor.lines(self.current())
    }

    pub fn header(&self, key: &str) -> Option<String> {
        meta::get(&self.lines(), key)
    }

    /// Rewrite a header field of the current buffer.
    pub fn set_header(&mut self, key: &str, value: &str) {
        let buf = self.current();
        let mut lines = self.ctx.editor.lines(buf);
        assert!(meta::set(&mut lines, key, value), "no header field {key}");
        self.ctx.editor.set_lines(buf, lines);
    }

    /// Replace everything after the header of the current buffer.
    pub fn set_body(&mut self, body: &[&str]) {
        let buf = self.current();
        let mut lines = self.ctx.editor.lines(buf);
        let close = meta::close_index(&lines).expect("buffer has a header");
        lines.truncate(close + 1);
        lines.extend(body.iter().map(|l| l.to_string()));
        self.ctx.editor.set_lines(buf, lines);
    }

    pub fn is_modified(&self) -> bool {
        self.ctx.editor.is_modified(self.current())
    }
}

/// Listener that sees every event and remembers it by its display form.
#[derive(Default)]
pub struct Recorder {
    seen: RefCell<Vec<String>>,
}

impl Recorder {
    /// Register a recorder behind the default listeners.
    pub fn attach(ctx: &mut AppContext) -> Rc<Recorder> {
        let recorder = Rc::new(Recorder::default());
        ctx.events.register(recorder.clone());
        recorder
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

impl Listener for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn kind(&self) -> EventKind {
        EventKind::PostSaved
    }

    fn is_target(&self, _event: &Event) -> bool {
        true
    }

    fn process_event(&self, event: &Event, _ctx: &mut AppContext) -> Result<()> {
        self.seen.borrow_mut().push(event.to_string());
        Ok(())
    }
}
