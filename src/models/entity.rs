//! # Domain Entities
//!
//! Posts and pages share one record shape distinguished by [`PostType`].
//! Templates are keyed by name. [`Entity`] closes over both and exposes
//! the [`Item`] capabilities commands rely on.

use serde::{Deserialize, Serialize};

use super::types::{ItemType, ViewName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

impl PostType {
    pub fn item_type(&self) -> ItemType {
        match self {
            PostType::Post => ItemType::Post,
            PostType::Page => ItemType::Page,
        }
    }

    pub fn from_item_type(item_type: ItemType) -> Option<PostType> {
        match item_type {
            ItemType::Post => Some(PostType::Post),
            ItemType::Page => Some(PostType::Page),
            ItemType::Template => None,
        }
    }
}

/// A post or a page in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Local key, `None` until the record is stored.
    pub id: Option<i64>,
    /// Id assigned by the blog once the item has been sent.
    pub post_id: Option<i64>,
    pub title: String,
    pub categories: String,
    pub tags: String,
    pub content: String,
    pub slug: String,
    pub syntax: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub status: String,
}

impl Post {
    pub fn new(post_type: PostType) -> Self {
        Self {
            id: None,
            post_id: None,
            title: String::new(),
            categories: String::new(),
            tags: String::new(),
            content: String::new(),
            slug: String::new(),
            syntax: "markdown".to_string(),
            post_type,
            status: "draft".to_string(),
        }
    }
}

/// A preview template. `%(title)s` and `%(content)s` are substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub content: String,
}

/// Capabilities shared by every stored entity.
pub trait Item {
    /// Identifying key: local id for posts and pages, name for templates.
    fn key(&self) -> String;

    /// Name shown in prompts and messages.
    fn display_name(&self) -> String;

    /// Header fields in display order.
    fn meta(&self) -> Vec<(&'static str, String)>;

    /// Edit view that displays this entity.
    fn edit_view(&self) -> ViewName;

    fn content(&self) -> &str;
}

impl Item for Post {
    fn key(&self) -> String {
        self.id.unwrap_or(0).to_string()
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn meta(&self) -> Vec<(&'static str, String)> {
        let id = self.id.unwrap_or(0).to_string();
        let post_id = self.post_id.unwrap_or(0).to_string();
        match self.post_type {
            PostType::Post => vec![
                ("id", id),
                ("post_id", post_id),
                ("title", self.title.clone()),
                ("categories", self.categories.clone()),
                ("tags", self.tags.clone()),
                ("slug", self.slug.clone()),
                ("status", self.status.clone()),
            ],
            PostType::Page => vec![
                ("id", id),
                ("post_id", post_id),
                ("title", self.title.clone()),
                ("slug", self.slug.clone()),
                ("status", self.status.clone()),
            ],
        }
    }

    fn edit_view(&self) -> ViewName {
        ViewName::edit_of(self.post_type.item_type())
    }

    fn content(&self) -> &str {
        &self.content
    }
}

impl Item for Template {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn meta(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
        ]
    }

    fn edit_view(&self) -> ViewName {
        ViewName::TmplEdit
    }

    fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Post(Post),
    Template(Template),
}

impl Entity {
    /// Filetype the edit view is put in.
    pub fn syntax(&self) -> &str {
        match self {
            Entity::Post(post) => &post.syntax,
            Entity::Template(_) => "html",
        }
    }

    pub fn item(&self) -> &dyn Item {
        match self {
            Entity::Post(post) => post,
            Entity::Template(tmpl) => tmpl,
        }
    }
}

impl Item for Entity {
    fn key(&self) -> String {
        self.item().key()
    }

    fn display_name(&self) -> String {
        self.item().display_name()
    }

    fn meta(&self) -> Vec<(&'static str, String)> {
        self.item().meta()
    }

    fn edit_view(&self) -> ViewName {
        self.item().edit_view()
    }

    fn content(&self) -> &str {
        self.item().content()
    }
}
