//! # JSON File Store
//!
//! Keeps the database in one JSON file. Writes go to a temporary file in
//! the same directory and are renamed over the target, so a crash never
//! leaves a half-written database behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Database, Store};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(data)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Database> {
        if !self.path.exists() {
            tracing::debug!("No database at {}, starting empty", self.path.display());
            return Ok(Database::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn persist(&self, db: &Database) -> Result<()> {
        let json = serde_json::to_string_pretty(db)?;
        atomic_write(&self.path, json.as_bytes())?;
        tracing::debug!("Database written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, PostType};

    #[test]
    fn load_should_start_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("ub.json"));
        assert_eq!(store.load().unwrap(), Database::default());
    }

    #[test]
    fn persist_should_round_trip_and_create_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("ub.json"));

        let mut db = Database::default();
        let mut post = Post::new(PostType::Page);
        post.title = "About".to_string();
        post.post_id = Some(12);
        let id = db.save_post(post);
        db.ensure_default_template();
        store.persist(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, db);
        assert_eq!(loaded.post(id, Some(PostType::Page)).unwrap().title, "About");
    }

    #[test]
    fn persist_should_replace_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("ub.json"));
        let mut db = Database::default();
        store.persist(&db).unwrap();
        db.ensure_default_template();
        store.persist(&db).unwrap();
        assert_eq!(store.load().unwrap().templates().len(), 1);
    }
}
