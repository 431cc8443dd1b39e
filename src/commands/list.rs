//! List - enumerate cached modules and origins

use anyhow::Result;

use modcache::cache::index::CacheIndex;
use modcache::cache::Resolver;
use modcache::core::model::{CacheError, ResultItem, ResultSet};
use modcache::core::paths::normalize_path;
use modcache::core::render::RenderConfig;

use super::{module_item, print};

fn missing_root(resolver: &Resolver) -> Option<ResultItem> {
    if resolver.cache_root().is_dir() {
        return None;
    }
    Some(ResultItem::error(CacheError::new(
        "CACHE_ROOT_MISSING",
        format!(
            "Cache root {} does not exist",
            resolver.cache_root().display()
        ),
    )))
}

/// Run the list command
pub fn run_list(resolver: &Resolver, origin: Option<&str>, config: RenderConfig) -> Result<()> {
    let mut result_set = ResultSet::new();

    if let Some(item) = missing_root(resolver) {
        result_set.push(item);
    } else {
        let modules = CacheIndex::new(resolver).modules(origin);
        result_set.extend(modules.iter().map(module_item));
    }

    print(&result_set, config);
    Ok(())
}

/// Run the origins command
pub fn run_origins(resolver: &Resolver, config: RenderConfig) -> Result<()> {
    let mut result_set = ResultSet::new();

    if let Some(item) = missing_root(resolver) {
        result_set.push(item);
    } else {
        for entry in CacheIndex::new(resolver).origins() {
            let item = ResultItem::origin(&entry.origin, normalize_path(&entry.dir));
            let item = match &entry.manifest {
                Some(manifest) => item.with_data(serde_json::json!({ "entries": manifest.len() })),
                None => item.with_error(CacheError::new(
                    "MANIFEST_UNREADABLE",
                    format!("Manifest of {} does not load", entry.origin),
                )),
            };
            result_set.push(item);
        }
    }

    print(&result_set, config);
    Ok(())
}
