//! Cache index - Enumerate origins and modules under the cache root

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use crate::cache::manifest::{OriginManifest, MANIFEST_FILE};
use crate::cache::module::{CacheModule, Resolver};
use crate::core::paths::origin_from_dir;

/// `<root>/<scheme>/<host>/manifest.json`
const MANIFEST_DEPTH: usize = 3;

/// One origin directory found in the cache
#[derive(Debug, Clone)]
pub struct OriginEntry {
    /// `scheme://host`
    pub origin: String,
    pub dir: PathBuf,
    /// `None` when the manifest exists but does not load
    pub manifest: Option<Arc<OriginManifest>>,
}

impl OriginEntry {
    fn matches(&self, filter: &str) -> bool {
        self.origin.contains(filter)
    }

    /// Modules of this origin whose hash file is present on disk
    fn modules(&self, resolver: &Resolver) -> Vec<CacheModule> {
        let Some(manifest) = &self.manifest else {
            return Vec::new();
        };
        manifest
            .entries()
            .map(|(hash, _)| self.dir.join(hash))
            .filter(|path| path.is_file())
            .filter_map(|path| CacheModule::create(resolver, path))
            .collect()
    }
}

/// Read-only view over everything in the cache
pub struct CacheIndex<'a> {
    resolver: &'a Resolver,
}

impl<'a> CacheIndex<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    /// All origin directories holding a manifest, sorted by origin
    pub fn origins(&self) -> Vec<OriginEntry> {
        let root = self.resolver.cache_root();
        let mut origins: Vec<OriginEntry> = WalkDir::new(root)
            .min_depth(MANIFEST_DEPTH)
            .max_depth(MANIFEST_DEPTH)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable cache entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE)
            .filter_map(|entry| {
                let dir = entry.path().parent()?.to_path_buf();
                let origin = origin_from_dir(&dir, root)?;
                let manifest = self.resolver.load_manifest(&dir);
                Some(OriginEntry {
                    origin,
                    dir,
                    manifest,
                })
            })
            .collect();

        origins.sort_by(|a, b| a.origin.cmp(&b.origin));
        origins
    }

    /// Every cached module, sorted by URL.
    ///
    /// `filter` keeps origins whose `scheme://host` contains it.
    pub fn modules(&self, filter: Option<&str>) -> Vec<CacheModule> {
        let origins: Vec<OriginEntry> = self
            .origins()
            .into_iter()
            .filter(|o| filter.map_or(true, |f| o.matches(f)))
            .collect();

        #[cfg(feature = "parallel")]
        let mut modules: Vec<CacheModule> = {
            use rayon::prelude::*;
            origins
                .par_iter()
                .flat_map_iter(|o| o.modules(self.resolver))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let mut modules: Vec<CacheModule> = origins
            .iter()
            .flat_map(|o| o.modules(self.resolver))
            .collect();

        modules.sort_by(|a, b| a.url().cmp(b.url()));
        modules
    }
}
