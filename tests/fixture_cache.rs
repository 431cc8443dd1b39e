//! Resolution tests against the checked-in fixture cache
//!
//! tests/fixtures/deno_dir/deps holds two origins:
//! - https://deno.land: std/path/{mod,posix,separator}.ts and std/version.ts?v=1
//! - https://example.com: polyfill.js, /npm:tough-cookie@3?dew and a listed
//!   but never fetched /missing.ts

use modcache::cache::index::CacheIndex;
use modcache::cache::root::{CacheRootLocator, DenoDir};
use modcache::cache::{CacheModule, Resolver};
use modcache::graph::ModuleGraph;
use std::path::PathBuf;

const PATH_MOD: &str = "a8279141187c0e9fe8d87e9d47cc99a860866846d3a4c8f03861199edc8df6db";
const PATH_POSIX: &str = "350d085851c4a33671080c4d9d51f6c57f42da4be73906b55139d69c8e26a7b9";
const VERSION: &str = "c2d17244d161905f98dbe062a2c409439c36848ba3fbf8927b366f06c21f09df";
const POLYFILL: &str = "5a70a30974ee828aa0d1a7d2ccccd0d3c28fbcda5e1b36c24cddda08f380c2fe";
const TOUGH_COOKIE: &str = "b7bde8b3d991759b95803bc8771306ff548adfaeb58dc805d75affb16b15b342";

fn deno_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("deno_dir")
}

fn resolver() -> Resolver {
    Resolver::with_root(deno_dir().join("deps"))
}

fn cached(resolver: &Resolver, host: &str, hash: &str) -> CacheModule {
    resolver
        .create(resolver.cache_root().join("https").join(host).join(hash))
        .expect("fixture module")
}

#[test]
fn deno_dir_locates_deps() {
    let dir = DenoDir::new(deno_dir());
    assert_eq!(dir.cache_root(), deno_dir().join("deps").as_path());
}

#[test]
fn create_maps_file_to_url() {
    let resolver = resolver();
    let module = cached(&resolver, "deno.land", PATH_MOD);

    assert_eq!(module.url(), "https://deno.land/std/path/mod.ts");
    assert_eq!(module.origin(), "https://deno.land");
    assert_eq!(module.hash(), PATH_MOD);
}

#[test]
fn create_keeps_query() {
    let resolver = resolver();
    let module = cached(&resolver, "deno.land", VERSION);
    assert_eq!(module.url(), "https://deno.land/std/version.ts?v=1");
}

#[test]
fn create_rejects_manifest_and_foreign_paths() {
    let resolver = resolver();
    let manifest = resolver.cache_root().join("https/deno.land/manifest.json");
    assert!(resolver.create(manifest).is_none());
    assert!(resolver.create("/tmp/unrelated/file").is_none());
}

#[test]
fn resolve_every_specifier_shape() {
    let resolver = resolver();
    let module = cached(&resolver, "deno.land", PATH_MOD);

    let posix = module.resolve_module("./posix.ts").unwrap();
    assert_eq!(posix.hash(), PATH_POSIX);

    let version = module.resolve_module("../version.ts?v=1").unwrap();
    assert_eq!(version.hash(), VERSION);

    let polyfill = module
        .resolve_module("https://example.com/polyfill.js")
        .unwrap();
    assert_eq!(polyfill.hash(), POLYFILL);

    let cookie = polyfill
        .resolve_module("/npm:tough-cookie@3?dew")
        .unwrap();
    assert_eq!(cookie.hash(), TOUGH_COOKIE);
    assert_eq!(cookie.url(), "https://example.com/npm:tough-cookie@3?dew");
}

#[test]
fn resolve_misses_are_none() {
    let resolver = resolver();
    let module = cached(&resolver, "deno.land", PATH_MOD);

    assert!(module.resolve_module("./win32.ts").is_none());
    assert!(module.resolve_module("../version.ts").is_none());
    assert!(module.resolve_module("https://nest.land/x/mod.ts").is_none());
    assert!(module.resolve_module("https://").is_none());
    assert!(module.resolve_module("std/path").is_none());
}

#[test]
fn resolution_is_independent_of_referrer_origin() {
    let resolver = resolver();
    let from_deno = cached(&resolver, "deno.land", PATH_MOD)
        .resolve_module("https://example.com/polyfill.js")
        .unwrap();
    let from_example = cached(&resolver, "example.com", TOUGH_COOKIE)
        .resolve_module("https://example.com/polyfill.js")
        .unwrap();
    assert_eq!(from_deno, from_example);
}

#[test]
fn index_lists_fetched_modules() {
    let resolver = resolver();
    let index = CacheIndex::new(&resolver);

    let origins: Vec<_> = index.origins().into_iter().map(|o| o.origin).collect();
    assert_eq!(origins, vec!["https://deno.land", "https://example.com"]);

    let urls: Vec<String> = index
        .modules(Some("example.com"))
        .iter()
        .map(|m| m.url().to_string())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/npm:tough-cookie@3?dew",
            "https://example.com/polyfill.js"
        ]
    );
    assert_eq!(index.modules(None).len(), 6);
}

#[test]
fn graph_spans_origins() {
    let resolver = resolver();
    let graph = ModuleGraph::build(&cached(&resolver, "deno.land", PATH_MOD), 16);

    assert_eq!(graph.nodes.len(), 5);
    assert!(graph.unresolved().is_empty());
    assert!(graph.find_cycles().is_empty());
    assert_eq!(
        graph.dependents("https://deno.land/std/path/separator.ts"),
        vec![
            "https://deno.land/std/path/mod.ts".to_string(),
            "https://deno.land/std/path/posix.ts".to_string()
        ]
    );
    assert_eq!(
        graph.nodes["https://example.com/npm:tough-cookie@3?dew"].depth,
        2
    );
}
