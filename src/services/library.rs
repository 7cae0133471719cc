use serde::Serialize;

use crate::error::CoreResult;
use crate::model::entry::{Collection, NewEntry, WordEntry};
use crate::services::store::RemoteStore;

/// In-memory saved and history lists of the signed-in user, newest first,
/// mirrored to the remote store.
#[derive(Debug, Default)]
pub struct WordLibrary {
    saved: Vec<WordEntry>,
    history: Vec<WordEntry>,
    history_cap: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SaveToggle {
    Saved { entry: WordEntry },
    Removed { id: String },
}

impl WordLibrary {
    pub fn new(history_cap: usize) -> Self {
        Self {
            saved: Vec::new(),
            history: Vec::new(),
            history_cap: history_cap.max(1),
        }
    }

    /// Loads both collections and drops history beyond the cap.
    pub fn load(store: &mut dyn RemoteStore, history_cap: usize) -> CoreResult<Self> {
        let mut lib = Self::new(history_cap);
        lib.saved = store.list(Collection::Saved)?;
        lib.history = store.list(Collection::History)?;
        lib.trim_history(store);
        Ok(lib)
    }

    pub fn entries(&self, collection: Collection) -> &[WordEntry] {
        match collection {
            Collection::Saved => &self.saved,
            Collection::History => &self.history,
        }
    }

    pub fn search(&self, collection: Collection, query: &str) -> Vec<&WordEntry> {
        self.entries(collection)
            .iter()
            .filter(|e| e.matches(query))
            .collect()
    }

    pub fn find_saved(&self, word: &str, target_language: &str) -> Option<&WordEntry> {
        let word = word.trim();
        self.saved
            .iter()
            .find(|s| s.word == word && s.target_language == target_language)
    }

    /// Appends a history record, then trims the oldest entries past the cap.
    pub fn record_history(
        &mut self,
        store: &mut dyn RemoteStore,
        entry: NewEntry,
    ) -> CoreResult<WordEntry> {
        let created = store.add(Collection::History, entry)?;
        self.history.insert(0, created.clone());
        self.trim_history(store);
        Ok(created)
    }

    /// Saving a word that is already saved for the same target language removes it.
    pub fn toggle_saved(
        &mut self,
        store: &mut dyn RemoteStore,
        entry: NewEntry,
    ) -> CoreResult<SaveToggle> {
        if let Some(existing) = self.find_saved(&entry.word, &entry.target_language) {
            let id = existing.id.clone();
            store.delete(Collection::Saved, &id)?;
            self.saved.retain(|s| s.id != id);
            tracing::debug!("[library] unsaved {id}");
            return Ok(SaveToggle::Removed { id });
        }

        let created = store.add(Collection::Saved, entry)?;
        self.saved.insert(0, created.clone());
        tracing::debug!("[library] saved {}", created.id);
        Ok(SaveToggle::Saved { entry: created })
    }

    pub fn delete(
        &mut self,
        store: &mut dyn RemoteStore,
        collection: Collection,
        id: &str,
    ) -> CoreResult<bool> {
        store.delete(collection, id)?;

        let list = match collection {
            Collection::Saved => &mut self.saved,
            Collection::History => &mut self.history,
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        Ok(list.len() != before)
    }

    pub fn clear_history(&mut self, store: &mut dyn RemoteStore) -> CoreResult<usize> {
        let ids: Vec<String> = self.history.iter().map(|e| e.id.clone()).collect();
        store.delete_many(Collection::History, &ids)?;
        self.history.clear();
        Ok(ids.len())
    }

    /// Local list always ends at the cap; remote deletes that fail are retried
    /// on the next load, which trims again.
    fn trim_history(&mut self, store: &mut dyn RemoteStore) -> usize {
        if self.history.len() <= self.history_cap {
            return 0;
        }

        let excess = self.history.split_off(self.history_cap);
        let ids: Vec<String> = excess.into_iter().map(|e| e.id).collect();

        if let Err(e) = store.delete_many(Collection::History, &ids) {
            tracing::warn!("[library] failed to delete {} trimmed history entries: {e}", ids.len());
        }

        tracing::debug!("[library] trimmed {} history entries", ids.len());
        ids.len()
    }
}
