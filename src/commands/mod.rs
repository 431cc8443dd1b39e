//! Command runners - one `run_*` per subcommand

pub mod doctor;
pub mod graph;
pub mod info;
pub mod list;
pub mod resolve;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use modcache::cache::{CacheModule, Resolver};
use modcache::core::model::{CacheError, ResultItem, ResultSet};
use modcache::core::paths::normalize_path;
use modcache::core::render::{RenderConfig, Renderer};
use modcache::core::util::{get_file_size, get_mtime_ms};

/// Make a command-line path absolute against the current directory
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(path))
}

/// Module result with size/mtime when the file is present
pub(crate) fn module_item(module: &CacheModule) -> ResultItem {
    let mut item = ResultItem::module(module);
    item.meta.size = get_file_size(module.filepath()).ok();
    item.meta.mtime_ms = get_mtime_ms(module.filepath()).ok();
    item
}

/// Error result for a file that is not a module of this cache
pub(crate) fn not_a_module(path: &Path, resolver: &Resolver) -> ResultItem {
    let mut item = ResultItem::error(CacheError::new(
        "NOT_A_CACHE_MODULE",
        format!(
            "{} is not a module listed under {}",
            path.display(),
            resolver.cache_root().display()
        ),
    ));
    item.path = Some(normalize_path(path));
    item
}

/// Look up the module for a command-line FILE argument
pub(crate) fn open_module(
    resolver: &Resolver,
    file: &Path,
) -> Result<(PathBuf, Option<CacheModule>)> {
    let path = absolute(file)?;
    let module = resolver.create(&path);
    Ok((path, module))
}

pub(crate) fn print(result_set: &ResultSet, config: RenderConfig) {
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(result_set));
}
