//! Info - map a cached file to its URL

use anyhow::Result;
use std::path::Path;

use modcache::cache::Resolver;
use modcache::core::model::{CacheError, ResultSet};
use modcache::core::render::RenderConfig;
use modcache::core::util::truncate_string;

use super::{module_item, not_a_module, open_module, print};

/// Run the info command
pub fn run_info(
    resolver: &Resolver,
    file: &Path,
    source: bool,
    max_bytes: usize,
    config: RenderConfig,
) -> Result<()> {
    let (path, module) = open_module(resolver, file)?;
    let mut result_set = ResultSet::new();

    let Some(module) = module else {
        result_set.push(not_a_module(&path, resolver));
        print(&result_set, config);
        return Ok(());
    };

    let mut item = module_item(&module);
    if source {
        match std::fs::read_to_string(module.filepath()) {
            Ok(content) => {
                let (excerpt, truncated) = truncate_string(&content, max_bytes);
                item.excerpt = Some(excerpt);
                item.meta.truncated = truncated;
            }
            Err(e) => {
                item = item.with_error(CacheError::new(
                    "READ_FAILED",
                    format!("Failed to read {}: {}", module.filepath().display(), e),
                ));
            }
        }
    }

    result_set.push(item);
    print(&result_set, config);
    Ok(())
}
