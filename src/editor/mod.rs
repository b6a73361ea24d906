//! # Editor Host
//!
//! The buffer/window API the command core drives. Everything the commands
//! need from the host editor goes through [`Editor`], so the core runs the
//! same against a real editor bridge or the in-memory [`MemoryEditor`].
//!
//! Line numbers passed to cursor methods are 1-based like in the host;
//! line indexes into buffer contents are 0-based.

pub mod memory;
pub mod view;

pub use memory::{MemoryEditor, Transcript};

use crate::error::Result;

/// Identifier of an open buffer.
pub type BufferId = usize;

/// Where a newly opened view goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Reuse the current buffer when it is scratch and unmodified.
    #[default]
    Current,
    Split,
    Tab,
}

impl std::str::FromStr for Placement {
    type Err = crate::error::UbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cur" | "current" => Ok(Placement::Current),
            "split" => Ok(Placement::Split),
            "tab" => Ok(Placement::Tab),
            other => Err(crate::error::UbError::NotImplemented(format!(
                "placement '{other}'"
            ))),
        }
    }
}

/// Buffer and window operations consumed by the command core.
pub trait Editor {
    fn current_buffer(&self) -> BufferId;

    /// All open buffers in creation order.
    fn buffers(&self) -> Vec<BufferId>;

    fn set_current_buffer(&mut self, id: BufferId) -> Result<()>;

    /// Open a fresh empty buffer in a split or tab and make it current.
    fn open_buffer(&mut self, placement: Placement) -> BufferId;

    /// Wipe a buffer back to a single empty line, dropping its variables,
    /// key mappings and modified flag.
    fn clear_buffer(&mut self, id: BufferId);

    fn close_buffer(&mut self, id: BufferId);

    /// File name, `None` for scratch buffers.
    fn buffer_name(&self, id: BufferId) -> Option<String>;

    fn lines(&self, id: BufferId) -> Vec<String>;

    /// Replace the whole content. Marks the buffer modified.
    fn set_lines(&mut self, id: BufferId, lines: Vec<String>);

    /// Insert lines before index `at`. Marks the buffer modified.
    fn insert_lines(&mut self, id: BufferId, at: usize, lines: Vec<String>);

    fn var(&self, id: BufferId, key: &str) -> Option<String>;

    fn set_var(&mut self, id: BufferId, key: &str, value: String);

    fn unset_var(&mut self, id: BufferId, key: &str);

    /// (line, column) with a 1-based line.
    fn cursor(&self, id: BufferId) -> (usize, usize);

    fn set_cursor(&mut self, id: BufferId, line: usize, col: usize);

    fn is_modified(&self, id: BufferId) -> bool;

    fn set_modified(&mut self, id: BufferId, modified: bool);

    fn is_modifiable(&self, id: BufferId) -> bool;

    fn set_modifiable(&mut self, id: BufferId, modifiable: bool);

    fn filetype(&self, id: BufferId) -> String;

    fn set_filetype(&mut self, id: BufferId, filetype: &str);

    /// Encoding label of buffer contents, e.g. `utf-8`.
    fn encoding(&self) -> String;

    /// Bind a key in one buffer to an ex command line.
    fn map_key(&mut self, id: BufferId, key: &str, command: String);

    fn key_mapping(&self, id: BufferId, key: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> bool;

    fn echo(&mut self, message: &str);

    fn echo_error(&mut self, message: &str);

    fn open_url(&mut self, url: &str) -> Result<()>;

    /// Line under the cursor of the current buffer.
    fn current_line(&self) -> String {
        let id = self.current_buffer();
        let (line, _) = self.cursor(id);
        self.lines(id)
            .get(line.saturating_sub(1))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace one line. Marks the buffer modified.
    fn set_line(&mut self, id: BufferId, idx: usize, line: String) {
        let mut lines = self.lines(id);
        if idx < lines.len() {
            lines[idx] = line;
        } else {
            lines.push(line);
        }
        self.set_lines(id, lines);
    }
}
