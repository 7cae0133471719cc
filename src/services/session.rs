use crate::error::CoreResult;
use crate::model::entry::{Collection, NewEntry, WordEntry};
use crate::model::settings::LanguagePreference;
use crate::services::library::{SaveToggle, WordLibrary};
use crate::services::local_store::LocalStore;
use crate::services::store::RemoteStore;

/// A signed-in user: their remote store and the lists loaded from it.
pub struct Session {
    uid: String,
    store: Box<dyn RemoteStore>,
    library: WordLibrary,
}

impl Session {
    pub fn open(uid: &str, mut store: Box<dyn RemoteStore>, history_cap: usize) -> CoreResult<Self> {
        let library = WordLibrary::load(store.as_mut(), history_cap)?;
        tracing::info!(
            "session opened: {} saved, {} history",
            library.entries(Collection::Saved).len(),
            library.entries(Collection::History).len()
        );

        Ok(Self {
            uid: uid.to_string(),
            store,
            library,
        })
    }

    pub fn library(&self) -> &WordLibrary {
        &self.library
    }

    pub fn record_history(&mut self, entry: NewEntry) -> CoreResult<WordEntry> {
        self.library.record_history(self.store.as_mut(), entry)
    }

    pub fn toggle_saved(&mut self, entry: NewEntry) -> CoreResult<SaveToggle> {
        self.library.toggle_saved(self.store.as_mut(), entry)
    }

    pub fn delete(&mut self, collection: Collection, id: &str) -> CoreResult<bool> {
        self.library.delete(self.store.as_mut(), collection, id)
    }

    pub fn clear_history(&mut self) -> CoreResult<usize> {
        self.library.clear_history(self.store.as_mut())
    }

    /// Local copy answers first; the remote document, when present, wins and
    /// refreshes the local copy.
    pub fn resolve_langs(&self, local: &mut LocalStore) -> Option<LanguagePreference> {
        let key = langs_key(&self.uid);

        let cached = local
            .get(&key)
            .and_then(|v| serde_json::from_value::<LanguagePreference>(v.clone()).ok())
            .filter(|l| l.is_complete());

        match self.store.load_langs() {
            Ok(Some(remote)) if remote.is_complete() => {
                if let Ok(v) = serde_json::to_value(&remote) {
                    local.set(&key, v);
                }
                Some(remote)
            }
            Ok(_) => cached,
            Err(e) => {
                tracing::warn!("failed to load remote language preference: {e}");
                cached
            }
        }
    }

    pub fn save_langs(&mut self, local: &mut LocalStore, langs: &LanguagePreference) -> CoreResult<()> {
        self.store.save_langs(langs)?;
        if let Ok(v) = serde_json::to_value(langs) {
            local.set(&langs_key(&self.uid), v);
        }
        Ok(())
    }

    /// Sign-out: the local preference copy goes with the session.
    pub fn close(self, local: &mut LocalStore) {
        local.remove(&langs_key(&self.uid));
        tracing::info!("session closed");
    }
}

fn langs_key(uid: &str) -> String {
    format!("langs_{uid}")
}
