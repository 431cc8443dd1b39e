//! Origin manifests
//!
//! Each origin directory holds a `manifest.json` mapping content hash to the
//! URL path+query that was fetched, e.g.
//! `{"3a5f...": "/std/path/mod.ts"}`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Manifest file name inside every origin directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Errors raised while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Bidirectional hash ↔ URL path+query table for one origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginManifest {
    by_hash: BTreeMap<String, String>,
    by_path: BTreeMap<String, String>,
}

impl OriginManifest {
    /// Build a manifest from hash → path entries
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let by_hash: BTreeMap<String, String> = entries.into_iter().collect();
        let mut by_path = BTreeMap::new();
        // Hashes are sha256 of the full URL, so a shared path only shows up in
        // hand-written manifests. by_hash iterates in hash order and the
        // smallest hash wins.
        for (hash, path) in &by_hash {
            by_path
                .entry(path.clone())
                .or_insert_with(|| hash.clone());
        }
        Self { by_hash, by_path }
    }

    /// Parse manifest JSON
    pub fn from_json(path: &Path, content: &str) -> Result<Self, ManifestError> {
        let map: BTreeMap<String, String> =
            serde_json::from_str(content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(map))
    }

    /// Read and parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &content)
    }

    pub fn get_url_path_from_hash(&self, hash: &str) -> Option<&str> {
        self.by_hash.get(hash).map(String::as_str)
    }

    pub fn get_hash_from_url_path(&self, url_path: &str) -> Option<&str> {
        self.by_path.get(url_path).map(String::as_str)
    }

    /// (hash, path) pairs in hash order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_hash.iter().map(|(h, p)| (h.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

/// Loads the manifest at a given file path; `None` when absent or unparsable.
pub trait ManifestLoader: Send + Sync {
    fn load(&self, manifest_path: &Path) -> Option<Arc<OriginManifest>>;
}

/// Reads manifests from disk on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestLoader;

impl ManifestLoader for FsManifestLoader {
    fn load(&self, manifest_path: &Path) -> Option<Arc<OriginManifest>> {
        match OriginManifest::from_file(manifest_path) {
            Ok(manifest) => Some(Arc::new(manifest)),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> OriginManifest {
        OriginManifest::from_entries(vec![
            ("aaa".to_string(), "/std/path/mod.ts".to_string()),
            ("bbb".to_string(), "/x?y=1".to_string()),
        ])
    }

    #[test]
    fn test_lookup_both_directions() {
        let manifest = sample();
        assert_eq!(manifest.get_url_path_from_hash("aaa"), Some("/std/path/mod.ts"));
        assert_eq!(manifest.get_hash_from_url_path("/x?y=1"), Some("bbb"));
    }

    #[test]
    fn test_lookup_miss() {
        let manifest = sample();
        assert_eq!(manifest.get_url_path_from_hash("zzz"), None);
        assert_eq!(manifest.get_hash_from_url_path("/x"), None);
    }

    #[test]
    fn test_shared_path_prefers_smallest_hash() {
        let manifest = OriginManifest::from_entries(vec![
            ("ccc".to_string(), "/dup.ts".to_string()),
            ("bbb".to_string(), "/dup.ts".to_string()),
        ]);
        assert_eq!(manifest.get_hash_from_url_path("/dup.ts"), Some("bbb"));
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn test_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, r#"{"abc": "/mod.ts"}"#).unwrap();

        let manifest = OriginManifest::from_file(&path).unwrap();
        assert_eq!(manifest.get_url_path_from_hash("abc"), Some("/mod.ts"));
    }

    #[test]
    fn test_from_file_missing() {
        let temp = tempdir().unwrap();
        let err = OriginManifest::from_file(&temp.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = OriginManifest::from_json(Path::new("m.json"), "[1, 2]").unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.to_string().contains("m.json"));
    }

    #[test]
    fn test_fs_loader() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(MANIFEST_FILE);

        assert!(FsManifestLoader.load(&path).is_none());

        std::fs::write(&path, "not json").unwrap();
        assert!(FsManifestLoader.load(&path).is_none());

        std::fs::write(&path, r#"{"abc": "/mod.ts"}"#).unwrap();
        let manifest = FsManifestLoader.load(&path).unwrap();
        assert_eq!(manifest.len(), 1);
    }
}
