//! modcache - Resolve module specifiers against a content-addressed module cache
//!
//! Remote modules fetched by Deno are stored as `<root>/<scheme>/<host>/<hash>`
//! next to a per-origin `manifest.json`. This crate maps such files back to
//! their URLs and resolves the imports written inside them to other cached
//! files:
//!
//! ```no_run
//! use modcache::cache::Resolver;
//!
//! let resolver = Resolver::with_root("/home/me/.cache/deno/deps");
//! if let Some(module) = resolver.resolve_url("https://deno.land/std/path/mod.ts") {
//!     let sibling = module.resolve_module("./posix.ts");
//!     println!("{} -> {:?}", module.url(), sibling.map(|m| m.filepath().to_path_buf()));
//! }
//! ```

pub mod cache;
pub mod core;
pub mod graph;
