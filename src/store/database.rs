//! # Database
//!
//! The local cache: posts and pages in one collection, templates in
//! another. Queries mirror what the listing and search commands need.

use serde::{Deserialize, Serialize};

use crate::models::{Post, PostType, Template};

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub id: i64,
    /// Remote id, or 0 when the item was never sent.
    pub post_id: i64,
    pub status: String,
    pub title: String,
}

impl From<&Post> for Summary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.unwrap_or(0),
            post_id: post.post_id.filter(|id| *id > 0).unwrap_or(0),
            status: post.status.clone(),
            title: post.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    templates: Vec<Template>,
}

/// Rows of a one-based page. A page whose offset does not fit is empty.
fn page_of<T>(items: Vec<T>, page_no: i64, page_size: i64) -> Vec<T> {
    let skip = page_no
        .checked_sub(1)
        .and_then(|n| n.checked_mul(page_size))
        .and_then(|n| usize::try_from(n.max(0)).ok());
    let Some(skip) = skip else {
        return Vec::new();
    };
    let take = usize::try_from(page_size.max(0)).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}

fn has_remote(post: &Post) -> bool {
    post.post_id.is_some()
}

impl Database {
    /// Insert or update a post. Returns its local id.
    pub fn save_post(&mut self, mut post: Post) -> i64 {
        if let Some(id) = post.id {
            if let Some(existing) = self.posts.iter_mut().find(|p| p.id == Some(id)) {
                *existing = post;
                return id;
            }
        }
        self.next_id = self.next_id.max(self.max_id()) + 1;
        let id = self.next_id;
        post.id = Some(id);
        self.posts.push(post);
        id
    }

    fn max_id(&self) -> i64 {
        self.posts.iter().filter_map(|p| p.id).max().unwrap_or(0)
    }

    /// Look up by local id, optionally restricted to one type.
    pub fn post(&self, id: i64, post_type: Option<PostType>) -> Option<&Post> {
        self.posts
            .iter()
            .find(|p| p.id == Some(id) && post_type.map_or(true, |t| p.post_type == t))
    }

    pub fn post_by_remote_id(&self, post_id: i64, post_type: Option<PostType>) -> Option<&Post> {
        self.posts
            .iter()
            .find(|p| p.post_id == Some(post_id) && post_type.map_or(true, |t| p.post_type == t))
    }

    pub fn delete_post(&mut self, id: i64) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != Some(id));
        before != self.posts.len()
    }

    /// Forget a remote id on every local record holding it.
    pub fn clear_remote_id(&mut self, post_id: i64) -> usize {
        let mut cleared = 0;
        for post in self.posts.iter_mut().filter(|p| p.post_id == Some(post_id)) {
            post.post_id = None;
            cleared += 1;
        }
        cleared
    }

    /// Local listing: unsent items by id descending, then sent items by
    /// remote id descending. The two partitions are concatenated, then paged.
    pub fn list_posts(&self, post_type: PostType, page_no: i64, page_size: i64) -> Vec<Summary> {
        let of_type = || self.posts.iter().filter(move |p| p.post_type == post_type);

        let mut unsent: Vec<&Post> = of_type().filter(|p| !has_remote(p)).collect();
        unsent.sort_by(|a, b| b.id.cmp(&a.id));

        let mut sent: Vec<&Post> = of_type().filter(|p| has_remote(p)).collect();
        sent.sort_by(|a, b| b.post_id.cmp(&a.post_id));

        let rows = unsent.into_iter().chain(sent).map(Summary::from).collect();
        page_of(rows, page_no, page_size)
    }

    /// Every keyword must appear in the title or the content. Case-sensitive.
    /// Ordered by status ascending, then remote id descending with unsent
    /// items last.
    pub fn find(&self, keywords: &[String], page_no: i64, page_size: i64) -> Vec<Summary> {
        let mut hits: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| {
                keywords
                    .iter()
                    .all(|kw| p.title.contains(kw.as_str()) || p.content.contains(kw.as_str()))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| match (a.post_id, b.post_id) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        let rows = hits.into_iter().map(Summary::from).collect();
        page_of(rows, page_no, page_size)
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn save_template(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn delete_template(&mut self, name: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.name != name);
        before != self.templates.len()
    }

    /// Seed the preview template used when none is named. Returns true if
    /// it had to be created.
    pub fn ensure_default_template(&mut self) -> bool {
        if self.template(DEFAULT_TEMPLATE_NAME).is_some() {
            return false;
        }
        self.templates.push(Template {
            name: DEFAULT_TEMPLATE_NAME.to_string(),
            description: "The default template for previewing drafts.".to_string(),
            content: DEFAULT_TEMPLATE.to_string(),
        });
        true
    }
}

pub const DEFAULT_TEMPLATE_NAME: &str = "default";

const DEFAULT_TEMPLATE: &str = r#"<html>
    <head>
        <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
        <title>%(title)s</title>
        <style>
            body {font-size: 14px; background-color: #D9DADC;}
            code {border: 1px solid #333; background-color: #DCDCDC; padding: 0px 3px; margin: 0px 5px;}
            pre {border: 1px solid #333; background-color: #B7D0DB; padding: 10px;}
            table,td,th {border-collapse: collapse;}
            td,th {border: 1px solid #333; padding: 5px;}
            th {background-color:#ebeff9;}
            blockquote {border: 1px dashed #333; background-color: #B7D0DB; padding: 10px;}
            .container {width: 80%%;margin:0px auto;padding:20px;background-color: #FFFFFF;}
            .title {font-size: 24px; font-weight: bold;}
        </style>
    </head>
    <body>
        <div class="container">
            <div class="title">%(title)s</div>
            <div class="content">
                %(content)s
            </div>
        </div>
    </body>
</html>"#;
