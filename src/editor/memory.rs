//! # In-Memory Editor
//!
//! A complete [`Editor`] kept in process memory. The headless shell runs on
//! it and tests drive commands through it. Messages, errors, prompts and
//! opened URLs are recorded in a shared [`Transcript`] so callers can
//! inspect them after handing the editor over to an application context.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::{BufferId, Editor, Placement};
use crate::error::{Result, UbError};

/// Answers confirmation prompts.
pub type Confirmer = Box<dyn FnMut(&str) -> bool>;

#[derive(Debug, Default)]
struct TranscriptInner {
    messages: Vec<String>,
    errors: Vec<String>,
    prompts: Vec<String>,
    urls: Vec<String>,
    answers: VecDeque<bool>,
}

/// Shared record of what the editor showed the user.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: Rc<RefCell<TranscriptInner>>,
}

impl Transcript {
    pub fn messages(&self) -> Vec<String> {
        self.inner.borrow().messages.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.borrow().errors.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner.borrow().prompts.clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.inner.borrow().urls.clone()
    }

    /// Queue an answer for the next confirmation prompt.
    pub fn answer(&self, yes: bool) {
        self.inner.borrow_mut().answers.push_back(yes);
    }

    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.borrow_mut().messages)
    }

    pub fn take_errors(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.borrow_mut().errors)
    }

    pub fn take_urls(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.borrow_mut().urls)
    }

    fn next_answer(&self) -> Option<bool> {
        self.inner.borrow_mut().answers.pop_front()
    }
}

#[derive(Debug)]
struct Buffer {
    id: BufferId,
    name: Option<String>,
    lines: Vec<String>,
    vars: HashMap<String, String>,
    mappings: HashMap<String, String>,
    cursor: (usize, usize),
    modified: bool,
    modifiable: bool,
    filetype: String,
}

impl Buffer {
    fn new(id: BufferId) -> Self {
        Self {
            id,
            name: None,
            lines: vec![String::new()],
            vars: HashMap::new(),
            mappings: HashMap::new(),
            cursor: (1, 0),
            modified: false,
            modifiable: true,
            filetype: String::new(),
        }
    }
}

pub struct MemoryEditor {
    buffers: Vec<Buffer>,
    current: BufferId,
    next_id: BufferId,
    encoding: String,
    transcript: Transcript,
    confirmer: Option<Confirmer>,
}

impl MemoryEditor {
    /// Start with one empty scratch buffer.
    pub fn new() -> Self {
        Self {
            buffers: vec![Buffer::new(1)],
            current: 1,
            next_id: 2,
            encoding: "utf-8".to_string(),
            transcript: Transcript::default(),
            confirmer: None,
        }
    }

    /// Answer prompts with a callback once queued answers run out.
    pub fn with_confirmer(mut self, confirmer: Confirmer) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    /// Give a buffer a file name so it is no longer treated as scratch.
    pub fn set_buffer_name(&mut self, id: BufferId, name: &str) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.name = Some(name.to_string());
        }
    }

    fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    fn buffer_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }

    fn clamp_cursor(buf: &mut Buffer) {
        let max = buf.lines.len().max(1);
        if buf.cursor.0 > max {
            buf.cursor.0 = max;
        }
        if buf.cursor.0 == 0 {
            buf.cursor.0 = 1;
        }
    }
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for MemoryEditor {
    fn current_buffer(&self) -> BufferId {
        self.current
    }

    fn buffers(&self) -> Vec<BufferId> {
        self.buffers.iter().map(|b| b.id).collect()
    }

    fn set_current_buffer(&mut self, id: BufferId) -> Result<()> {
        if self.buffer(id).is_none() {
            return Err(UbError::NotFound(format!("Buffer {id} does not exist !")));
        }
        self.current = id;
        Ok(())
    }

    fn open_buffer(&mut self, placement: Placement) -> BufferId {
        let id = self.next_id;
        self.next_id += 1;
        self.buffers.push(Buffer::new(id));
        self.current = id;
        tracing::debug!("Opened buffer {id} ({placement:?})");
        id
    }

    fn clear_buffer(&mut self, id: BufferId) {
        if let Some(buf) = self.buffer_mut(id) {
            let name = buf.name.take();
            *buf = Buffer::new(id);
            buf.name = name;
        }
    }

    fn close_buffer(&mut self, id: BufferId) {
        self.buffers.retain(|b| b.id != id);
        if self.buffers.is_empty() {
            let fresh = self.next_id;
            self.next_id += 1;
            self.buffers.push(Buffer::new(fresh));
        }
        if self.current == id {
            self.current = self.buffers.last().map(|b| b.id).unwrap_or(1);
        }
        tracing::debug!("Closed buffer {id}");
    }

    fn buffer_name(&self, id: BufferId) -> Option<String> {
        self.buffer(id).and_then(|b| b.name.clone())
    }

    fn lines(&self, id: BufferId) -> Vec<String> {
        self.buffer(id).map(|b| b.lines.clone()).unwrap_or_default()
    }

    fn set_lines(&mut self, id: BufferId, lines: Vec<String>) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.lines = if lines.is_empty() {
                vec![String::new()]
            } else {
                lines
            };
            buf.modified = true;
            Self::clamp_cursor(buf);
        }
    }

    fn insert_lines(&mut self, id: BufferId, at: usize, lines: Vec<String>) {
        if let Some(buf) = self.buffer_mut(id) {
            let at = at.min(buf.lines.len());
            buf.lines.splice(at..at, lines);
            buf.modified = true;
        }
    }

    fn var(&self, id: BufferId, key: &str) -> Option<String> {
        self.buffer(id).and_then(|b| b.vars.get(key).cloned())
    }

    fn set_var(&mut self, id: BufferId, key: &str, value: String) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.vars.insert(key.to_string(), value);
        }
    }

    fn unset_var(&mut self, id: BufferId, key: &str) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.vars.remove(key);
        }
    }

    fn cursor(&self, id: BufferId) -> (usize, usize) {
        self.buffer(id).map(|b| b.cursor).unwrap_or((1, 0))
    }

    fn set_cursor(&mut self, id: BufferId, line: usize, col: usize) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.cursor = (line, col);
            Self::clamp_cursor(buf);
        }
    }

    fn is_modified(&self, id: BufferId) -> bool {
        self.buffer(id).map(|b| b.modified).unwrap_or(false)
    }

    fn set_modified(&mut self, id: BufferId, modified: bool) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.modified = modified;
        }
    }

    fn is_modifiable(&self, id: BufferId) -> bool {
        self.buffer(id).map(|b| b.modifiable).unwrap_or(false)
    }

    fn set_modifiable(&mut self, id: BufferId, modifiable: bool) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.modifiable = modifiable;
        }
    }

    fn filetype(&self, id: BufferId) -> String {
        self.buffer(id).map(|b| b.filetype.clone()).unwrap_or_default()
    }

    fn set_filetype(&mut self, id: BufferId, filetype: &str) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.filetype = filetype.to_string();
        }
    }

    fn encoding(&self) -> String {
        self.encoding.clone()
    }

    fn map_key(&mut self, id: BufferId, key: &str, command: String) {
        if let Some(buf) = self.buffer_mut(id) {
            buf.mappings.insert(key.to_string(), command);
        }
    }

    fn key_mapping(&self, id: BufferId, key: &str) -> Option<String> {
        self.buffer(id).and_then(|b| b.mappings.get(key).cloned())
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.transcript
            .inner
            .borrow_mut()
            .prompts
            .push(prompt.to_string());
        if let Some(answer) = self.transcript.next_answer() {
            return answer;
        }
        match self.confirmer.as_mut() {
            Some(confirmer) => confirmer(prompt),
            None => false,
        }
    }

    fn echo(&mut self, message: &str) {
        self.transcript
            .inner
            .borrow_mut()
            .messages
            .push(message.to_string());
    }

    fn echo_error(&mut self, message: &str) {
        self.transcript
            .inner
            .borrow_mut()
            .errors
            .push(message.to_string());
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        self.transcript.inner.borrow_mut().urls.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_editor_should_have_one_scratch_buffer() {
        let editor = MemoryEditor::new();
        assert_eq!(editor.buffers(), vec![1]);
        assert_eq!(editor.lines(1), vec![String::new()]);
        assert!(editor.buffer_name(1).is_none());
        assert!(!editor.is_modified(1));
    }

    #[test]
    fn set_lines_should_mark_buffer_modified() {
        let mut editor = MemoryEditor::new();
        editor.set_lines(1, lines(&["a", "b"]));
        assert!(editor.is_modified(1));
        editor.set_line(1, 1, "c".to_string());
        assert_eq!(editor.lines(1), lines(&["a", "c"]));
    }

    #[test]
    fn clear_buffer_should_drop_vars_and_mappings() {
        let mut editor = MemoryEditor::new();
        editor.set_var(1, "page_no", "2".to_string());
        editor.map_key(1, "<del>", "UBDelUnderCursor".to_string());
        editor.set_lines(1, lines(&["x"]));
        editor.set_modifiable(1, false);
        editor.clear_buffer(1);
        assert!(editor.var(1, "page_no").is_none());
        assert!(editor.key_mapping(1, "<del>").is_none());
        assert!(!editor.is_modified(1));
        assert!(editor.is_modifiable(1));
    }

    #[test]
    fn close_current_buffer_should_focus_last_remaining() {
        let mut editor = MemoryEditor::new();
        let second = editor.open_buffer(Placement::Split);
        let third = editor.open_buffer(Placement::Tab);
        editor.set_current_buffer(second).unwrap();
        editor.close_buffer(second);
        assert_eq!(editor.current_buffer(), third);
        assert_eq!(editor.buffers(), vec![1, third]);
    }

    #[test]
    fn closing_last_buffer_should_leave_a_fresh_one() {
        let mut editor = MemoryEditor::new();
        editor.close_buffer(1);
        assert_eq!(editor.buffers().len(), 1);
        assert_ne!(editor.current_buffer(), 1);
    }

    #[test]
    fn confirm_should_use_queued_answers_then_confirmer() {
        let mut editor = MemoryEditor::new().with_confirmer(Box::new(|_| true));
        let transcript = editor.transcript();
        transcript.answer(false);
        assert!(!editor.confirm("first?"));
        assert!(editor.confirm("second?"));
        assert_eq!(transcript.prompts(), lines(&["first?", "second?"]));
    }

    #[test]
    fn confirm_without_answer_should_decline() {
        let mut editor = MemoryEditor::new();
        assert!(!editor.confirm("sure?"));
    }

    #[test]
    fn current_line_should_follow_cursor() {
        let mut editor = MemoryEditor::new();
        editor.set_lines(1, lines(&["header", "row"]));
        editor.set_cursor(1, 2, 0);
        assert_eq!(editor.current_line(), "row");
    }

    #[test]
    fn transcript_should_record_output() {
        let mut editor = MemoryEditor::new();
        let transcript = editor.transcript();
        editor.echo("done");
        editor.echo_error("failed");
        editor.open_url("file:///tmp/x.html").unwrap();
        assert_eq!(transcript.take_messages(), lines(&["done"]));
        assert_eq!(transcript.errors(), lines(&["failed"]));
        assert_eq!(transcript.urls(), lines(&["file:///tmp/x.html"]));
        assert!(transcript.messages().is_empty());
    }
}
