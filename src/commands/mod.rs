//! # Commands
//!
//! Every user action is a [`Command`] run through [`execute`]:
//!
//! 1. `pre_exec` checks collaborators, the current view and the buffer
//!    syntax, and opens a store session when the command needs one.
//! 2. `exec` does the work against the session and the blog.
//! 3. The session is committed.
//! 4. `post_exec` releases the session, updates the editor and fires events.
//!
//! Any error stops the run. The session is dropped with the command, so
//! nothing reaches the store unless `exec` succeeded.

pub mod base;
pub mod convert;
pub mod delete;
pub mod list;
pub mod new;
pub mod open;
pub mod preview;
pub mod refresh;
pub mod save;
pub mod send;
pub mod upload;

pub use base::CommandBase;
pub use convert::Convert;
pub use delete::{Delete, DeleteUnderCursor};
pub use list::{Find, List};
pub use new::{BlogThis, New};
pub use open::{Open, OpenUnderCursor};
pub use preview::Preview;
pub use refresh::{on_buffer_enter, refresh_current, Refresh};
pub use save::Save;
pub use send::SendItem;
pub use upload::UploadMedia;

use crate::context::AppContext;
use crate::error::{Result, UbError};

pub trait Command {
    fn name(&self) -> &'static str;

    fn base(&self) -> &CommandBase;

    fn base_mut(&mut self) -> &mut CommandBase;

    fn pre_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::pre_exec(self.base_mut(), ctx)
    }

    fn exec(&mut self, _ctx: &mut AppContext) -> Result<()> {
        Err(UbError::NotImplemented(self.name().to_string()))
    }

    fn post_exec(&mut self, ctx: &mut AppContext) -> Result<()> {
        base::post_exec(self.base_mut(), ctx)
    }
}

/// Run a command through all of its phases. The command is consumed.
pub fn execute<C: Command>(mut cmd: C, ctx: &mut AppContext) -> Result<()> {
    tracing::debug!("Running {}", cmd.name());
    cmd.pre_exec(ctx)?;
    cmd.exec(ctx)?;
    cmd.base_mut().commit()?;
    cmd.post_exec(ctx)?;
    tracing::debug!("{} finished", cmd.name());
    Ok(())
}
