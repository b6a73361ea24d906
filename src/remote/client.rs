//! # XML-RPC Blog Client
//!
//! Blocking metaWeblog / WordPress client. Every call posts one XML-RPC
//! document to the configured endpoint with the account credentials.

use std::time::Duration;

use reqwest::blocking::Client;

use super::xmlrpc::{self, Value};
use super::{BlogApi, MediaFile, MediaObject, PostContent, RemotePost, RemoteSummary};
use crate::config::BlogSettings;
use crate::error::{Result, UbError};
use crate::models::PostType;

pub struct XmlRpcBlogApi {
    endpoint: String,
    login_name: String,
    password: String,
    client: Client,
}

impl XmlRpcBlogApi {
    pub fn new(blog: &BlogSettings, timeout_secs: u64) -> Result<Self> {
        tracing::debug!("Creating XML-RPC client for {}", blog.xmlrpc_url());
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: blog.xmlrpc_url(),
            login_name: blog.login_name.clone(),
            password: blog.password.clone(),
            client,
        })
    }

    fn user(&self) -> Value {
        Value::str(self.login_name.clone())
    }

    fn pass(&self) -> Value {
        Value::str(self.password.clone())
    }

    fn call(&self, method: &str, params: &[Value]) -> Result<Value> {
        tracing::debug!("XML-RPC call {method}");
        let body = xmlrpc::encode_call(method, params);
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UbError::Protocol {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let text = response.text()?;
        let value = xmlrpc::decode_response(&text);
        if let Err(e) = &value {
            tracing::warn!("XML-RPC call {method} failed: {e}");
        }
        value
    }

    fn post_struct(content: &PostContent) -> Value {
        let status_key = match content.post_type {
            PostType::Post => "post_status",
            PostType::Page => "page_status",
        };
        let mut members = vec![
            ("title", Value::str(content.title.clone())),
            ("description", Value::str(content.description.clone())),
            ("wp_slug", Value::str(content.slug.clone())),
            (
                "post_type",
                Value::str(match content.post_type {
                    PostType::Post => "post",
                    PostType::Page => "page",
                }),
            ),
            (status_key, Value::str(content.status.clone())),
        ];
        if content.post_type == PostType::Post {
            members.push((
                "categories",
                Value::Array(content.categories.iter().cloned().map(Value::str).collect()),
            ));
            members.push(("mt_keywords", Value::str(content.tags.clone())));
        }
        Value::structure(members)
    }

    fn remote_post(value: &Value, id_key: &str, status_key: &str) -> Result<RemotePost> {
        let post_id = value
            .member(id_key)
            .and_then(Value::as_i64)
            .ok_or_else(|| UbError::MalformedResponse(format!("missing {id_key}")))?;
        Ok(RemotePost {
            post_id,
            title: value.text_of("title"),
            description: value.text_of("description"),
            categories: value
                .member("categories")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(Value::to_text).collect())
                .unwrap_or_default(),
            tags: value.text_of("mt_keywords"),
            slug: value.text_of("wp_slug"),
            status: value.text_of(status_key),
        })
    }

    fn summaries(value: &Value, id_key: &str, status_key: &str) -> Result<Vec<RemoteSummary>> {
        let items = value
            .as_array()
            .ok_or_else(|| UbError::MalformedResponse("expected an array".to_string()))?;
        items
            .iter()
            .map(|item| {
                Ok(RemoteSummary {
                    post_id: item
                        .member(id_key)
                        .and_then(Value::as_i64)
                        .ok_or_else(|| UbError::MalformedResponse(format!("missing {id_key}")))?,
                    title: item.text_of("title"),
                    status: item.text_of(status_key),
                })
            })
            .collect()
    }
}

impl BlogApi for XmlRpcBlogApi {
    fn new_post(&self, content: &PostContent, publish: bool) -> Result<i64> {
        let result = self.call(
            "metaWeblog.newPost",
            &[
                Value::str(""),
                self.user(),
                self.pass(),
                Self::post_struct(content),
                Value::Bool(publish),
            ],
        )?;
        result
            .as_i64()
            .ok_or_else(|| UbError::MalformedResponse(format!("bad post id {result:?}")))
    }

    fn edit_post(&self, post_id: i64, content: &PostContent, publish: bool) -> Result<()> {
        self.call(
            "metaWeblog.editPost",
            &[
                Value::str(post_id.to_string()),
                self.user(),
                self.pass(),
                Self::post_struct(content),
                Value::Bool(publish),
            ],
        )?;
        Ok(())
    }

    fn delete_post(&self, post_id: i64) -> Result<()> {
        self.call(
            "metaWeblog.deletePost",
            &[
                Value::str(""),
                Value::str(post_id.to_string()),
                self.user(),
                self.pass(),
            ],
        )?;
        Ok(())
    }

    fn delete_page(&self, page_id: i64) -> Result<()> {
        self.call(
            "wp.deletePage",
            &[Value::str(""), self.user(), self.pass(), Value::Int(page_id)],
        )?;
        Ok(())
    }

    fn get_post(&self, post_id: i64) -> Result<RemotePost> {
        let value = self.call(
            "metaWeblog.getPost",
            &[Value::str(post_id.to_string()), self.user(), self.pass()],
        )?;
        Self::remote_post(&value, "postid", "post_status")
    }

    fn get_page(&self, page_id: i64) -> Result<RemotePost> {
        let value = self.call(
            "wp.getPage",
            &[Value::str(""), Value::Int(page_id), self.user(), self.pass()],
        )?;
        Self::remote_post(&value, "page_id", "page_status")
    }

    fn recent_posts(&self, count: usize) -> Result<Vec<RemoteSummary>> {
        let value = self.call(
            "metaWeblog.getRecentPosts",
            &[
                Value::str(""),
                self.user(),
                self.pass(),
                Value::Int(count as i64),
            ],
        )?;
        Self::summaries(&value, "postid", "post_status")
    }

    fn pages(&self) -> Result<Vec<RemoteSummary>> {
        let value = self.call("wp.getPages", &[Value::str(""), self.user(), self.pass()])?;
        Self::summaries(&value, "page_id", "page_status")
    }

    fn categories(&self) -> Result<Vec<String>> {
        let value = self.call(
            "metaWeblog.getCategories",
            &[Value::str(""), self.user(), self.pass()],
        )?;
        Ok(value
            .as_array()
            .map(|items| items.iter().map(|c| c.text_of("description")).collect())
            .unwrap_or_default())
    }

    fn new_media_object(&self, media: &MediaFile) -> Result<MediaObject> {
        let value = self.call(
            "metaWeblog.newMediaObject",
            &[
                Value::str(""),
                self.user(),
                self.pass(),
                Value::structure([
                    ("name", Value::str(media.name.clone())),
                    ("type", Value::str(media.mime_type.clone())),
                    ("bits", Value::Base64(media.bits.clone())),
                ]),
            ],
        )?;
        Ok(MediaObject {
            file: value.text_of("file"),
            url: value.text_of("url"),
        })
    }
}
