//! # Headless Shell
//!
//! A line-oriented stand-in for the host editor. Besides the `UB*` ex
//! commands it understands a few buffer commands so views can be inspected
//! and edited from a terminal or a script.

use std::io::Write;

use anyhow::Result;

use crate::context::AppContext;
use crate::editor::view::view_name;
use crate::editor::{Editor, Transcript};
use crate::entry;

const HELP: &str = "\
buffers | ls            list buffers
b <n>                   switch to buffer n
print | p               print the current buffer
cursor <line> [col]     move the cursor
append <text>           append a line to the current buffer
setline <n> <text>      replace line n
setf <syntax>           set the filetype
press <key>             run the command mapped to key
UB...                   run an UltraBlog command
q | quit                leave";

pub struct Shell {
    ctx: AppContext,
    transcript: Transcript,
}

impl Shell {
    pub fn new(ctx: AppContext, transcript: Transcript) -> Self {
        Self { ctx, transcript }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    /// Run one line. Returns `false` once the user asked to quit.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "q" | "quit" => return Ok(false),
            "help" => writeln!(out, "{HELP}")?,
            "buffers" | "ls" => self.list_buffers(out)?,
            "b" => match rest.parse::<usize>() {
                Ok(id) => match self.ctx.editor.set_current_buffer(id) {
                    Ok(()) => {
                        entry::on_buffer_enter(&mut self.ctx);
                    }
                    Err(e) => self.ctx.editor.echo_error(&e.report()),
                },
                Err(_) => writeln!(out, "usage: b <n>")?,
            },
            "print" | "p" => self.print_buffer(out)?,
            "cursor" => {
                let mut nums = rest.split_whitespace().map(|n| n.parse::<usize>());
                match (nums.next(), nums.next()) {
                    (Some(Ok(line)), None) => self.set_cursor(line, 0),
                    (Some(Ok(line)), Some(Ok(col))) => self.set_cursor(line, col),
                    _ => writeln!(out, "usage: cursor <line> [col]")?,
                }
            }
            "append" => {
                let buf = self.ctx.editor.current_buffer();
                let len = self.ctx.editor.lines(buf).len();
                self.ctx.editor.insert_lines(buf, len, vec![rest.to_string()]);
            }
            "setline" => {
                let (num, text) = rest.split_once(' ').unwrap_or((rest, ""));
                match num.parse::<usize>() {
                    Ok(n) if n > 0 => {
                        let buf = self.ctx.editor.current_buffer();
                        self.ctx.editor.set_line(buf, n - 1, text.to_string());
                    }
                    _ => writeln!(out, "usage: setline <n> <text>")?,
                }
            }
            "setf" => {
                let buf = self.ctx.editor.current_buffer();
                self.ctx.editor.set_filetype(buf, rest);
            }
            "press" => {
                let buf = self.ctx.editor.current_buffer();
                match self.ctx.editor.key_mapping(buf, rest) {
                    Some(mapped) => {
                        entry::run_ex_command(&mut self.ctx, &mapped)?;
                    }
                    None => writeln!(out, "no mapping for {rest}")?,
                }
            }
            _ => {
                if !entry::run_ex_command(&mut self.ctx, line)? {
                    writeln!(out, "unknown command: {command}")?;
                }
            }
        }

        self.flush_transcript(out)?;
        Ok(true)
    }

    fn set_cursor(&mut self, line: usize, col: usize) {
        let buf = self.ctx.editor.current_buffer();
        self.ctx.editor.set_cursor(buf, line, col);
    }

    fn list_buffers<W: Write>(&self, out: &mut W) -> Result<()> {
        let editor: &dyn Editor = self.ctx.editor.as_ref();
        let current = editor.current_buffer();
        for id in editor.buffers() {
            let marker = if id == current { '%' } else { ' ' };
            let view = view_name(editor, id)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "[scratch]".to_string());
            let modified = if editor.is_modified(id) { " +" } else { "" };
            writeln!(out, "{marker}{id:>3} {view}{modified}")?;
        }
        Ok(())
    }

    fn print_buffer<W: Write>(&self, out: &mut W) -> Result<()> {
        let editor: &dyn Editor = self.ctx.editor.as_ref();
        let buf = editor.current_buffer();
        let (cursor, _) = editor.cursor(buf);
        for (idx, line) in editor.lines(buf).iter().enumerate() {
            let marker = if idx + 1 == cursor { '>' } else { ' ' };
            writeln!(out, "{marker}{:>4} {line}", idx + 1)?;
        }
        Ok(())
    }

    fn flush_transcript<W: Write>(&self, out: &mut W) -> Result<()> {
        for message in self.transcript.take_messages() {
            writeln!(out, "{message}")?;
        }
        for error in self.transcript.take_errors() {
            writeln!(out, "E: {error}")?;
        }
        for url in self.transcript.take_urls() {
            writeln!(out, "open: {url}")?;
        }
        Ok(())
    }
}
