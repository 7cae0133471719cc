use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};
use crate::model::entry::{Collection, NewEntry, WordEntry};
use crate::model::settings::LanguagePreference;
use crate::services::local_store::write_atomic;

const LANGS_FILE: &str = "langs.json";
const ID_LEN: usize = 20;

/// Per-user remote persistence: the `saved` and `history` collections and
/// the `settings/langs` document.
pub trait RemoteStore {
    /// Persists a new entry, assigning its id and creation time.
    fn add(&mut self, collection: Collection, entry: NewEntry) -> CoreResult<WordEntry>;

    fn delete(&mut self, collection: Collection, id: &str) -> CoreResult<()>;

    fn delete_many(&mut self, collection: Collection, ids: &[String]) -> CoreResult<()>;

    /// Newest first.
    fn list(&self, collection: Collection) -> CoreResult<Vec<WordEntry>>;

    fn load_langs(&self) -> CoreResult<Option<LanguagePreference>>;

    fn save_langs(&mut self, langs: &LanguagePreference) -> CoreResult<()>;
}

/// JSON documents under `<data_dir>/users/<sha256(uid)>/`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(data_dir: &Path, uid: &str) -> CoreResult<Self> {
        if uid.trim().is_empty() {
            return Err(CoreError::validation("uid is required"));
        }

        let dir = data_dir.join("users").join(user_dir_name(uid));
        fs::create_dir_all(&dir)?;
        tracing::debug!("[store] user dir {}", dir.display());

        Ok(Self { dir })
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn read_collection(&self, collection: Collection) -> CoreResult<Vec<WordEntry>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|e| {
            CoreError::Storage(format!("invalid {}: {e}", path.display()))
        })
    }

    fn write_collection(&self, collection: Collection, entries: &[WordEntry]) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.collection_path(collection), json.as_bytes())?;
        Ok(())
    }
}

impl RemoteStore for FileStore {
    fn add(&mut self, collection: Collection, entry: NewEntry) -> CoreResult<WordEntry> {
        let mut entries = self.read_collection(collection)?;

        let created = entry.into_entry(new_id(), Utc::now());
        entries.insert(0, created.clone());

        self.write_collection(collection, &entries)?;
        Ok(created)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> CoreResult<()> {
        let mut entries = self.read_collection(collection)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() != before {
            self.write_collection(collection, &entries)?;
        }
        Ok(())
    }

    fn delete_many(&mut self, collection: Collection, ids: &[String]) -> CoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut entries = self.read_collection(collection)?;
        entries.retain(|e| !ids.contains(&e.id));
        self.write_collection(collection, &entries)
    }

    fn list(&self, collection: Collection) -> CoreResult<Vec<WordEntry>> {
        let mut entries = self.read_collection(collection)?;
        // Stable: entries written in the same instant keep insertion order.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    fn load_langs(&self) -> CoreResult<Option<LanguagePreference>> {
        let path = self.dir.join(LANGS_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path)?;
        let langs = serde_json::from_str(&data)
            .map_err(|e| CoreError::Storage(format!("invalid {}: {e}", path.display())))?;
        Ok(Some(langs))
    }

    fn save_langs(&mut self, langs: &LanguagePreference) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(langs)?;
        write_atomic(&self.dir.join(LANGS_FILE), json.as_bytes())?;
        Ok(())
    }
}

fn user_dir_name(uid: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uid.trim().as_bytes());
    hex::encode(hasher.finalize())
}

fn new_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}
