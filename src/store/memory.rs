//! In-memory store used by tests and throwaway sessions.

use std::cell::{Cell, RefCell};

use super::{Database, Store};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
    db: RefCell<Database>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            db: RefCell::new(db),
            writes: Cell::new(0),
        }
    }

    /// Number of times the database was persisted.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn snapshot(&self) -> Database {
        self.db.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Database> {
        Ok(self.db.borrow().clone())
    }

    fn persist(&self, db: &Database) -> Result<()> {
        *self.db.borrow_mut() = db.clone();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
