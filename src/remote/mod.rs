//! # Remote Blog API
//!
//! The publishing calls the commands need, behind [`BlogApi`].
//! [`XmlRpcBlogApi`] implements them over the metaWeblog/WordPress XML-RPC
//! interface.

pub mod client;
pub mod xmlrpc;

pub use client::XmlRpcBlogApi;

use crate::error::Result;
use crate::models::PostType;

/// Post or page as fetched from the blog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemotePost {
    pub post_id: i64,
    pub title: String,
    /// HTML body.
    pub description: String,
    pub categories: Vec<String>,
    pub tags: String,
    pub slug: String,
    pub status: String,
}

/// One entry of a remote listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteSummary {
    pub post_id: i64,
    pub title: String,
    pub status: String,
}

/// Content sent when creating or updating a post or page.
#[derive(Debug, Clone, PartialEq)]
pub struct PostContent {
    pub title: String,
    /// HTML body.
    pub description: String,
    pub categories: Vec<String>,
    pub tags: String,
    pub slug: String,
    pub post_type: PostType,
    pub status: String,
}

/// File to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub bits: Vec<u8>,
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaObject {
    pub file: String,
    pub url: String,
}

/// Remote publishing operations, authenticated by the implementation.
pub trait BlogApi {
    /// Create a post or page and return its remote id.
    fn new_post(&self, content: &PostContent, publish: bool) -> Result<i64>;

    fn edit_post(&self, post_id: i64, content: &PostContent, publish: bool) -> Result<()>;

    fn delete_post(&self, post_id: i64) -> Result<()>;

    fn delete_page(&self, page_id: i64) -> Result<()>;

    fn get_post(&self, post_id: i64) -> Result<RemotePost>;

    fn get_page(&self, page_id: i64) -> Result<RemotePost>;

    fn recent_posts(&self, count: usize) -> Result<Vec<RemoteSummary>>;

    fn pages(&self) -> Result<Vec<RemoteSummary>>;

    /// Category names configured on the blog.
    fn categories(&self) -> Result<Vec<String>>;

    fn new_media_object(&self, media: &MediaFile) -> Result<MediaObject>;
}
