//! # Upload Media
//!
//! Upload a file to the blog and insert a link to it below the cursor.

use std::fs;
use std::path::{Path, PathBuf};

use super::base::{self, CommandBase};
use super::Command;
use crate::context::AppContext;
use crate::error::{Result, UbError};
use crate::models::Syntax;
use crate::remote::{MediaFile, MediaObject};

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/x-wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        _ => "application/octet-stream",
    }
}

/// Split `syntax###template` and fill in `%(file)s` and `%(url)s`.
fn media_link(setting: &str, media: &MediaObject) -> Result<(Syntax, String)> {
    let (syntax, template) = match setting.split_once("###") {
        Some((syntax, template)) => (syntax.trim().parse::<Syntax>()?, template),
        None => (Syntax::Markdown, setting),
    };
    let link = template
        .replace("%(file)s", &media.file)
        .replace("%(url)s", &media.url);
    Ok((syntax, link))
}

pub struct UploadMedia {
    base: CommandBase,
    path: PathBuf,
    uploaded: Option<MediaObject>,
}

impl UploadMedia {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        Self {
            base: CommandBase::new()
                .view_scopes(&["post_edit"])
                .content_aware()
                .needs_api(),
            path,
            uploaded: None,
        }
    }
}

impl Command for UploadMedia {
    fn name(&self) -> &'static str {
        "upload-media"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        if !self.path.is_file() {
            return Err(UbError::FileNotFound(self.path.clone()));
        }
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let bits = fs::read(&self.path)?;
        let media = MediaFile {
            name: self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_type(&self.path).to_string(),
            bits,
        };
        let uploaded = ctx.api()?.new_media_object(&media)?;
        tracing::info!("Uploaded {} to {}", self.path.display(), uploaded.url);
        self.uploaded = Some(uploaded);
        Ok(())
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(&mut self.base, ctx)?;
        let Some(media) = self.uploaded.take() else {
            return Ok(());
        };
        let (from, link) = media_link(&ctx.settings.options.tmpl_img_url, &media)?;
        let buf = ctx.editor.current_buffer();
        let to = ctx.editor.filetype(buf).parse::<Syntax>()?;
        let link = ctx.converter.convert(&link, from, to, self.base.encoding)?;

        let (line, _) = ctx.editor.cursor(buf);
        let lines: Vec<String> = link.trim_end().split('\n').map(str::to_string).collect();
        ctx.editor.insert_lines(buf, line, lines);
        Ok(())
    }
}
