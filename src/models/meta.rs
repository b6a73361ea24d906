//! # Metadata Header
//!
//! Edit buffers start with a comment block holding one `$key:` line per
//! field:
//!
//! ```text
//! <!--
//! $id:              1
//! $title:           Hello
//! -->
//! ```
//!
//! Field order and the close marker are significant. The body is every
//! line after the close marker.

use std::sync::OnceLock;

use regex::Regex;

use super::types::ViewName;

pub const META_OPEN: &str = "<!--";
pub const META_CLOSE: &str = "-->";

const POST_FIELDS: &[&str] = &["id", "post_id", "title", "categories", "tags", "slug", "status"];
const PAGE_FIELDS: &[&str] = &["id", "post_id", "title", "slug", "status"];
const TMPL_FIELDS: &[&str] = &["name", "description"];

fn close_marker() -> &'static Regex {
    static CLOSE: OnceLock<Regex> = OnceLock::new();
    CLOSE.get_or_init(|| Regex::new(r"^\s*-->").expect("close marker pattern is valid"))
}

fn item_pattern(key: &str) -> Option<Regex> {
    Regex::new(&format!(r"^\${}:\s*", regex::escape(key))).ok()
}

/// Header fields an edit view carries, in order.
pub fn fields_of(view: ViewName) -> &'static [&'static str] {
    match view {
        ViewName::PostEdit => POST_FIELDS,
        ViewName::PageEdit => PAGE_FIELDS,
        ViewName::TmplEdit => TMPL_FIELDS,
        _ => &[],
    }
}

pub fn format_line(key: &str, value: &str) -> String {
    format!("${:<17}{}", format!("{key}:"), value)
}

/// Render a complete header block.
pub fn render(fields: &[(&str, String)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(fields.len() + 2);
    lines.push(META_OPEN.to_string());
    lines.extend(fields.iter().map(|(key, value)| format_line(key, value)));
    lines.push(META_CLOSE.to_string());
    lines
}

/// Index of the close marker line, if the buffer has one.
pub fn close_index(lines: &[String]) -> Option<usize> {
    lines.iter().position(|line| close_marker().is_match(line))
}

/// Raw value of a header field, trimmed.
pub fn get(lines: &[String], key: &str) -> Option<String> {
    let pattern = item_pattern(key)?;
    for line in lines {
        if close_marker().is_match(line) {
            break;
        }
        if pattern.is_match(line) {
            let value = line.split_once(':').map(|(_, v)| v).unwrap_or("");
            return Some(value.trim().to_string());
        }
    }
    None
}

/// Numeric header field. Zero, negative and non-numeric values read as absent.
pub fn get_id(lines: &[String], key: &str) -> Option<i64> {
    get(lines, key)
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// Rewrite a header field in place. Returns false when the field is absent.
pub fn set(lines: &mut [String], key: &str, value: &str) -> bool {
    let Some(pattern) = item_pattern(key) else {
        return false;
    };
    for line in lines.iter_mut() {
        if close_marker().is_match(line) {
            break;
        }
        if pattern.is_match(line) {
            *line = format_line(key, value);
            return true;
        }
    }
    false
}

/// Lines after the close marker, or everything when there is no header.
pub fn body(lines: &[String]) -> &[String] {
    match close_index(lines) {
        Some(idx) => &lines[idx + 1..],
        None => lines,
    }
}

/// Body joined back into a single string.
pub fn body_text(lines: &[String]) -> String {
    body(lines).join("\n")
}
