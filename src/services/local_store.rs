use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

const LOCAL_FILE: &str = "local_store.json";
pub const KEY_PREFIX: &str = "wordy_";

/// Flat key/value file standing in for browser local storage.
///
/// Every key is namespaced with `wordy_`. Failures never surface: a bad read
/// is "absent", a failed write is logged and dropped.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl LocalStore {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(LOCAL_FILE);
        let values = load(&path);
        Self { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(&namespaced(key))
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(namespaced(key), value);
        self.persist();
    }

    pub fn remove(&mut self, key: &str) {
        if self.values.remove(&namespaced(key)).is_some() {
            self.persist();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.values) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("[local] failed to serialize store: {e}");
                return;
            }
        };

        if let Err(e) = write_atomic(&self.path, json.as_bytes()) {
            tracing::warn!("[local] dropped write to {}: {e}", self.path.display());
        }
    }
}

fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

fn load(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }

    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("[local] failed to read {}: {e}", path.display());
            return Map::new();
        }
    };

    match serde_json::from_str::<Map<String, Value>>(&data) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("[local] failed to parse {}: {e}", path.display());
            Map::new()
        }
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "store".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
