//! Cache root location
//!
//! The resolver never reads process-wide state itself; it asks an injected
//! [`CacheRootLocator`] for the `deps` directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable pointing at the Deno directory
pub const DENO_DIR_ENV: &str = "DENO_DIR";

/// Sub-directory of the Deno directory holding remote modules
pub const DEPS_DIR: &str = "deps";

/// Errors raised while locating the cache root
#[derive(Debug, Error)]
pub enum CacheRootError {
    #[error("DENO_DIR is not set and no platform cache directory is available")]
    NoCacheDir,
}

/// Returns the directory under which origins are nested as `<scheme>/<host>/<hash>`.
pub trait CacheRootLocator: Send + Sync {
    fn cache_root(&self) -> &Path;
}

/// A cache root given explicitly.
#[derive(Debug, Clone)]
pub struct FixedRoot(PathBuf);

impl FixedRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }
}

impl CacheRootLocator for FixedRoot {
    fn cache_root(&self) -> &Path {
        &self.0
    }
}

/// The `deps` directory of a Deno directory.
#[derive(Debug, Clone)]
pub struct DenoDir {
    deps: PathBuf,
}

impl DenoDir {
    /// Use an explicit Deno directory
    pub fn new(deno_dir: impl AsRef<Path>) -> Self {
        Self {
            deps: deno_dir.as_ref().join(DEPS_DIR),
        }
    }

    /// Locate the Deno directory from `DENO_DIR` or the platform cache dir
    pub fn from_env() -> Result<Self, CacheRootError> {
        Self::from_env_value(std::env::var_os(DENO_DIR_ENV).map(PathBuf::from))
    }

    fn from_env_value(deno_dir: Option<PathBuf>) -> Result<Self, CacheRootError> {
        match deno_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(Self::new(dir)),
            _ => dirs::cache_dir()
                .map(|dir| Self::new(dir.join("deno")))
                .ok_or(CacheRootError::NoCacheDir),
        }
    }
}

impl CacheRootLocator for DenoDir {
    fn cache_root(&self) -> &Path {
        &self.deps
    }
}
