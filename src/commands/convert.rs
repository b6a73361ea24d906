//! # Convert
//!
//! Rewrite the current buffer in another markup syntax. Edit views keep
//! their header and only the body is converted.

use super::base::{self, CommandBase};
use super::Command;
use crate::context::AppContext;
use crate::editor::view::current_view;
use crate::error::Result;
use crate::models::{meta, Syntax};

pub struct Convert {
    base: CommandBase,
    to: String,
    from: Option<String>,
    resolved: Option<(Syntax, Syntax)>,
}

impl Convert {
    /// Without `from` the buffer's filetype is the source syntax.
    pub fn new(to: impl Into<String>, from: Option<String>) -> Self {
        Self {
            base: CommandBase::new(),
            to: to.into(),
            from,
            resolved: None,
        }
    }
}

impl Command for Convert {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut CommandBase {
        &mut self.base
    }

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(&mut self.base, ctx)?;
        let to = self.to.parse::<Syntax>()?;
        let from = match &self.from {
            Some(from) => from.clone(),
            None => ctx.editor.filetype(ctx.editor.current_buffer()),
        };
        self.resolved = Some((from.parse::<Syntax>()?, to));
        Ok(())
    }

    fn exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        let Some((from, to)) = self.resolved else {
            return Ok(());
        };
        let buf = ctx.editor.current_buffer();
        let lines = ctx.editor.lines(buf);
        let in_edit_view = current_view(ctx.editor.as_ref()).is_some_and(|v| v.is_edit());

        let (header, body) = match meta::close_index(&lines) {
            Some(idx) if in_edit_view => lines.split_at(idx + 1),
            _ => lines.split_at(0),
        };
        let converted = ctx
            .converter
            .convert(&body.join("\n"), from, to, self.base.encoding)?;

        let mut result = header.to_vec();
        result.extend(converted.split('\n').map(str::to_string));
        ctx.editor.set_lines(buf, result);
        ctx.editor.set_filetype(buf, to.as_str());
        tracing::debug!("Converted buffer {buf} from {from} to {to}");
        Ok(())
    }
}
