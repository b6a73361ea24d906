//! # Local Store
//!
//! Commands work on a [`Session`]: a private working copy of the database
//! that is written back only on [`Session::commit`]. Dropping a session
//! without committing discards its changes.

pub mod database;
pub mod file;
pub mod memory;

use std::rc::Rc;

pub use database::{Database, Summary, DEFAULT_TEMPLATE_NAME};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Backing storage for the local cache.
pub trait Store {
    fn load(&self) -> Result<Database>;

    fn persist(&self, db: &Database) -> Result<()>;
}

/// Seed the default preview template if the store lacks it.
pub fn init_default_template(store: &dyn Store) -> Result<()> {
    let mut db = store.load()?;
    if db.ensure_default_template() {
        tracing::info!("Created default preview template");
        store.persist(&db)?;
    }
    Ok(())
}

/// Transactional access to the store.
pub struct Session {
    store: Rc<dyn Store>,
    db: Database,
    dirty: bool,
}

impl Session {
    pub fn open(store: Rc<dyn Store>) -> Result<Self> {
        let db = store.load()?;
        Ok(Self {
            store,
            db,
            dirty: false,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Mutable access marks the session as needing a commit.
    pub fn db_mut(&mut self) -> &mut Database {
        self.dirty = true;
        &mut self.db
    }

    /// Write pending changes. A clean session writes nothing.
    pub fn commit(&mut self) -> Result<()> {
        if self.dirty {
            self.store.persist(&self.db)?;
            self.dirty = false;
            tracing::debug!("Session committed");
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("Session released with uncommitted changes, rolling back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, PostType};

    #[test]
    fn commit_should_persist_changes() {
        let store = Rc::new(MemoryStore::new());
        let mut session = Session::open(store.clone()).unwrap();
        session.db_mut().save_post(Post::new(PostType::Post));
        session.commit().unwrap();
        assert_eq!(store.writes(), 1);
        assert!(store.snapshot().post(1, None).is_some());
    }

    #[test]
    fn dropped_session_should_roll_back() {
        let store = Rc::new(MemoryStore::new());
        {
            let mut session = Session::open(store.clone()).unwrap();
            session.db_mut().save_post(Post::new(PostType::Post));
        }
        assert_eq!(store.writes(), 0);
        assert!(store.snapshot().post(1, None).is_none());
    }

    #[test]
    fn clean_commit_should_not_write() {
        let store = Rc::new(MemoryStore::new());
        let mut session = Session::open(store.clone()).unwrap();
        session.commit().unwrap();
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn init_default_template_should_write_once() {
        let store = MemoryStore::new();
        init_default_template(&store).unwrap();
        init_default_template(&store).unwrap();
        assert_eq!(store.writes(), 1);
    }
}
