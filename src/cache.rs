//! Workspace-scoped parameter value cache.
//!
//! The cache remembers the last value entered for each template parameter
//! name so repeated runs pre-fill prompts. It lives at
//! `<workspace>/.xsltr/params.json`, grows without eviction, and carries no
//! schema version. The collector reads it once at the start of a collection
//! pass and writes it once at the end; overlapping runs are last-writer-wins,
//! which is acceptable for single-user usage.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const STATE_DIR: &str = ".xsltr";
const CACHE_FILE: &str = "params.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    params: BTreeMap<String, String>,
}

/// Last-entered value per parameter name, persisted across runs.
#[derive(Debug)]
pub struct ParamCache {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ParamCache {
    /// Load the cache for a workspace root.
    ///
    /// A missing cache file is an empty cache. A corrupt file is logged and
    /// treated as empty rather than failing the transform flow.
    pub fn load(workspace: &Path) -> ParamCache {
        let path = workspace.join(STATE_DIR).join(CACHE_FILE);
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<CacheFile>(&content) {
                Ok(file) => file.params,
                Err(err) => {
                    tracing::warn!("ignoring corrupt parameter cache {}: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        ParamCache { path, values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Write the full cache back to disk, creating the state dir if needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        let file = CacheFile {
            params: self.values.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write parameter cache {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_values_across_loads() {
        let workspace = TempDir::new().expect("tempdir");
        let mut cache = ParamCache::load(workspace.path());
        cache.insert("a", "1");
        cache.save().expect("save cache");

        let reloaded = ParamCache::load(workspace.path());
        assert_eq!(reloaded.get("a"), Some("1"));
        assert_eq!(reloaded.get("unknown"), None);
    }

    #[test]
    fn missing_file_is_an_empty_cache() {
        let workspace = TempDir::new().expect("tempdir");
        let cache = ParamCache::load(workspace.path());
        assert_eq!(cache.get("anything"), None);
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let workspace = TempDir::new().expect("tempdir");
        let dir = workspace.path().join(STATE_DIR);
        std::fs::create_dir_all(&dir).expect("state dir");
        std::fs::write(dir.join(CACHE_FILE), "not json").expect("write");

        let cache = ParamCache::load(workspace.path());
        assert_eq!(cache.get("a"), None);
    }
}
