//! Doctor - cache location and manifest health

use anyhow::Result;

use modcache::cache::index::CacheIndex;
use modcache::cache::Resolver;
use modcache::core::model::{CacheError, ResultItem, ResultSet};
use modcache::core::paths::normalize_path;
use modcache::core::render::RenderConfig;

use super::print;

/// Collect the doctor report
pub fn check_cache(resolver: &Resolver) -> ResultSet {
    let mut result_set = ResultSet::new();
    let root = resolver.cache_root();
    let root_str = normalize_path(root);

    if !root.is_dir() {
        let mut item = ResultItem::error(CacheError::new(
            "CACHE_ROOT_MISSING",
            format!("Cache root {} does not exist", root_str),
        ));
        item.path = Some(root_str);
        result_set.push(item);
        return result_set;
    }

    let origins = CacheIndex::new(resolver).origins();
    let entries: usize = origins
        .iter()
        .filter_map(|o| o.manifest.as_ref())
        .map(|m| m.len())
        .sum();
    let broken: Vec<&str> = origins
        .iter()
        .filter(|o| o.manifest.is_none())
        .map(|o| o.origin.as_str())
        .collect();

    let mut status = ResultItem::status(
        format!(
            "✓ cache root {} ({} origins, {} manifest entries)",
            root_str,
            origins.len(),
            entries
        ),
        serde_json::json!({
            "cache_root": root_str.clone(),
            "origins": origins.len(),
            "entries": entries,
            "broken_manifests": broken,
        }),
    );
    status.path = Some(root_str);
    result_set.push(status);

    for origin in broken {
        result_set.push(ResultItem::error(CacheError::new(
            "MANIFEST_UNREADABLE",
            format!("Manifest of {} does not load", origin),
        )));
    }

    result_set
}

/// Run the doctor command
pub fn run_doctor(resolver: &Resolver, config: RenderConfig) -> Result<()> {
    let result_set = check_cache(resolver);
    print(&result_set, config);

    if result_set.items.iter().any(|i| !i.errors.is_empty()) {
        eprintln!("\n⚠️  The module cache has problems, see the errors above.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcache::core::model::Kind;
    use tempfile::tempdir;

    #[test]
    fn test_check_cache_missing_root() {
        let resolver = Resolver::with_root("/definitely/not/a/cache/root");
        let report = check_cache(&resolver);
        assert_eq!(report.len(), 1);
        assert_eq!(report.items[0].errors[0].code, "CACHE_ROOT_MISSING");
    }

    #[test]
    fn test_check_cache_broken_manifest() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("https/deno.land");
        let bad = temp.path().join("https/broken.dev");
        std::fs::create_dir_all(&good).unwrap();
        std::fs::create_dir_all(&bad).unwrap();
        std::fs::write(good.join("manifest.json"), r#"{"h1": "/a.ts", "h2": "/b.ts"}"#).unwrap();
        std::fs::write(bad.join("manifest.json"), "not json").unwrap();

        let report = check_cache(&Resolver::with_root(temp.path()));
        assert_eq!(report.items[0].kind, Kind::Status);
        let data = report.items[0].data.as_ref().unwrap();
        assert_eq!(data["origins"], 2);
        assert_eq!(data["entries"], 2);
        assert_eq!(data["broken_manifests"][0], "https://broken.dev");
        assert_eq!(report.items[1].errors[0].code, "MANIFEST_UNREADABLE");
    }
}
