//! Resolve / lookup - specifiers and URLs to cached files

use anyhow::Result;
use std::path::Path;

use modcache::cache::Resolver;
use modcache::core::model::{ResultItem, ResultSet};
use modcache::core::render::RenderConfig;

use super::{module_item, not_a_module, open_module, print};

/// Run the resolve command
pub fn run_resolve(
    resolver: &Resolver,
    file: &Path,
    specifiers: &[String],
    config: RenderConfig,
) -> Result<()> {
    let (path, module) = open_module(resolver, file)?;
    let mut result_set = ResultSet::new();

    match module {
        Some(module) => {
            for specifier in specifiers {
                let item = match module.resolve_module(specifier) {
                    Some(target) => module_item(&target).with_specifier(specifier),
                    None => ResultItem::unresolved(specifier),
                };
                result_set.push(item);
            }
        }
        None => result_set.push(not_a_module(&path, resolver)),
    }

    print(&result_set, config);
    Ok(())
}

/// Run the lookup command
pub fn run_lookup(resolver: &Resolver, urls: &[String], config: RenderConfig) -> Result<()> {
    let result_set: ResultSet = urls
        .iter()
        .map(|url| match resolver.resolve_url(url) {
            Some(module) => module_item(&module).with_specifier(url),
            None => ResultItem::unresolved(url),
        })
        .collect();

    print(&result_set, config);
    Ok(())
}
