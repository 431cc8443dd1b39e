//! Cached modules and specifier resolution
//!
//! A [`CacheModule`] is one hashed file under `<root>/<scheme>/<host>/`.
//! Its URL is recovered from the origin's manifest, and import specifiers
//! found inside it are resolved to other cached modules through the same
//! manifests. Every miss is a plain `None`: an import that was never fetched
//! into the cache is a normal outcome.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::cache::manifest::{FsManifestLoader, ManifestLoader, OriginManifest, MANIFEST_FILE};
use crate::cache::root::{CacheRootError, CacheRootLocator, DenoDir, FixedRoot};
use crate::cache::specifier::Specifier;
use crate::core::paths::{file_name_str, origin_from_dir, posix_dirname, posix_resolve};

/// The injected context every resolution runs against.
///
/// Cloning is cheap; each [`CacheModule`] carries one so it can hand
/// targets back to [`CacheModule::create`].
#[derive(Clone)]
pub struct Resolver {
    locator: Arc<dyn CacheRootLocator>,
    loader: Arc<dyn ManifestLoader>,
}

impl Resolver {
    pub fn new(
        locator: impl CacheRootLocator + 'static,
        loader: impl ManifestLoader + 'static,
    ) -> Self {
        Self {
            locator: Arc::new(locator),
            loader: Arc::new(loader),
        }
    }

    /// Resolver over a fixed `deps` directory reading manifests from disk
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(FixedRoot::new(root), FsManifestLoader)
    }

    /// Resolver over `$DENO_DIR/deps` (or the platform default)
    pub fn from_env() -> Result<Self, CacheRootError> {
        Ok(Self::new(DenoDir::from_env()?, FsManifestLoader))
    }

    pub fn cache_root(&self) -> &Path {
        self.locator.cache_root()
    }

    /// `<root>/<scheme>/<host>`
    pub fn origin_dir(&self, scheme: &str, host: &str) -> PathBuf {
        self.cache_root().join(scheme).join(host)
    }

    /// Load the manifest of an origin directory
    pub fn load_manifest(&self, origin_dir: &Path) -> Option<Arc<OriginManifest>> {
        self.loader.load(&origin_dir.join(MANIFEST_FILE))
    }

    /// Build the module for a cache file, see [`CacheModule::create`]
    pub fn create(&self, filepath: impl Into<PathBuf>) -> Option<CacheModule> {
        CacheModule::create(self, filepath)
    }

    /// Find the cached module for a fully-qualified http(s) URL.
    ///
    /// The origin is taken from the URL itself, so this works across origins
    /// and without a referrer module.
    pub fn resolve_url(&self, specifier: &str) -> Option<CacheModule> {
        let url = match Url::parse(specifier) {
            Ok(url) => url,
            Err(e) => {
                debug!("Invalid URL specifier {:?}: {}", specifier, e);
                return None;
            }
        };

        if !matches!(url.scheme(), "http" | "https") {
            trace!("Unsupported scheme in {}", url);
            return None;
        }

        let host = url.host_str()?;
        let origin_dir = self.origin_dir(url.scheme(), host);
        let manifest = self.load_manifest(&origin_dir)?;

        let mut path_and_query = url.path().to_string();
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        let Some(hash) = manifest.get_hash_from_url_path(&path_and_query) else {
            trace!("{} not in manifest of {}", path_and_query, origin_dir.display());
            return None;
        };

        CacheModule::create(self, origin_dir.join(hash))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("cache_root", &self.cache_root())
            .finish_non_exhaustive()
    }
}

/// One module file inside the cache
#[derive(Clone)]
pub struct CacheModule {
    filepath: PathBuf,
    url: String,
    origin: String,
    manifest: Arc<OriginManifest>,
    resolver: Resolver,
}

impl CacheModule {
    /// Build the module for `filepath`, which must be `<root>/<scheme>/<host>/<hash>`.
    ///
    /// Returns `None` when the path is outside the cache root, the origin
    /// manifest is missing or unreadable, or the hash is not listed in it.
    pub fn create(resolver: &Resolver, filepath: impl Into<PathBuf>) -> Option<Self> {
        let filepath = filepath.into();
        let root = resolver.cache_root();

        if !filepath.starts_with(root) {
            trace!("{} is outside {}", filepath.display(), root.display());
            return None;
        }

        let hash = file_name_str(&filepath)?;
        let origin_dir = filepath.parent()?;
        let origin = origin_from_dir(origin_dir, root)?;

        let manifest = resolver.load_manifest(origin_dir)?;
        let Some(path_and_query) = manifest.get_url_path_from_hash(hash) else {
            trace!("hash {} not in manifest of {}", hash, origin);
            return None;
        };

        let url = format!("{}{}", origin, path_and_query);
        Some(Self {
            filepath,
            url,
            origin,
            manifest,
            resolver: resolver.clone(),
        })
    }

    /// Location of the cached content on disk
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// The URL this file was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `scheme://host` of the URL
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Content hash, i.e. the file name
    pub fn hash(&self) -> &str {
        file_name_str(&self.filepath).unwrap_or_default()
    }

    pub fn manifest(&self) -> &OriginManifest {
        &self.manifest
    }

    fn origin_dir(&self) -> &Path {
        self.filepath
            .parent()
            .unwrap_or_else(|| self.resolver.cache_root())
    }

    /// Resolve an import specifier written inside this module.
    ///
    /// - `/npm:tough-cookie@3?dew` is looked up verbatim in this origin's manifest
    /// - `./sub/mod.ts` is resolved against this module's URL path
    /// - `https://example.com/mod.ts` is looked up in that URL's own origin
    ///
    /// Anything else (bare names) does not resolve.
    pub fn resolve_module(&self, module_name: &str) -> Option<CacheModule> {
        match Specifier::classify(module_name) {
            Specifier::CacheAbsolute(path) => self.resolve_url_path(path),
            Specifier::Relative(relative) => {
                let current = Url::parse(&self.url).ok()?;
                let target = posix_resolve(posix_dirname(current.path()), relative);
                self.resolve_url_path(&target)
            }
            Specifier::Url(url) => self.resolver.resolve_url(url),
            Specifier::Bare(name) => {
                trace!("Bare specifier {:?} is not resolved from the cache", name);
                None
            }
        }
    }

    /// Look up a URL path+query in this module's own origin
    fn resolve_url_path(&self, url_path: &str) -> Option<CacheModule> {
        let Some(hash) = self.manifest.get_hash_from_url_path(url_path) else {
            trace!("{} not in manifest of {}", url_path, self.origin);
            return None;
        };
        CacheModule::create(&self.resolver, self.origin_dir().join(hash))
    }
}

impl fmt::Debug for CacheModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheModule")
            .field("filepath", &self.filepath)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CacheModule {
    fn eq(&self, other: &Self) -> bool {
        self.filepath == other.filepath && self.url == other.url
    }
}

impl Eq for CacheModule {}
