//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use modcache::cache::manifest::FsManifestLoader;
use modcache::cache::root::DenoDir;
use modcache::cache::Resolver;
use modcache::core::render::{OutputFormat, RenderConfig};

use crate::commands::absolute;

/// modcache - resolve imports against a content-addressed module cache.
#[derive(Parser, Debug)]
#[command(name = "modcache")]
#[command(
    author,
    version,
    about,
    long_about = r#"modcache reads a Deno-style module cache laid out as
<root>/<scheme>/<host>/<hash> with one manifest.json per origin, and maps
cached files back to their URLs and imports to other cached files.

Each command prints a ResultSet in the selected format (default: jsonl).
Specifiers that do not resolve are reported as `unresolved` items; they are
data, not failures.

Examples:
    modcache info ~/.cache/deno/deps/https/deno.land/3a5f...
    modcache resolve <FILE> ./util.ts https://deno.land/std/path/mod.ts
    modcache lookup https://deno.land/std/path/mod.ts
    modcache list --origin deno.land
    modcache graph <FILE> --graph-format tree
"#
)]
pub struct Cli {
    /// Deno directory (the cache root is its `deps` sub-directory).
    #[arg(
        long,
        global = true,
        env = "DENO_DIR",
        value_name = "DIR",
        long_help = "Deno directory. Remote modules are read from DIR/deps.\n\n\
Defaults to $DENO_DIR, then to the platform cache directory (e.g. ~/.cache/deno)."
    )]
    pub deno_dir: Option<PathBuf>,

    /// Cache root to read directly (overrides --deno-dir).
    #[arg(
        long,
        global = true,
        env = "MODCACHE_ROOT",
        value_name = "DIR",
        long_help = "Directory holding <scheme>/<host>/<hash> entries. Takes precedence over\n\
--deno-dir when both are given."
    )]
    pub cache_root: Option<PathBuf>,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (one URL or excerpt per line)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug logging on stderr, including why lookups miss.\n\
Without this flag RUST_LOG is honoured."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the URL a cached file was fetched from.
    #[command(long_about = "Map a file inside the cache to its URL using the origin manifest.\n\n\
Examples:\n\
  modcache info $DENO_DIR/deps/https/deno.land/<hash>\n\
  modcache info <FILE> --source --max-bytes 2000\n")]
    Info {
        /// Cached file (<root>/<scheme>/<host>/<hash>).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include the module source as excerpt.
        #[arg(long)]
        source: bool,

        /// Maximum bytes of source to emit.
        #[arg(long, default_value = "65536", value_name = "BYTES")]
        max_bytes: usize,
    },

    /// Resolve import specifiers written inside a cached module.
    #[command(
        long_about = r#"Resolve each SPECIFIER as if it were imported from FILE.

Supported shapes:
- ./rel.ts, ../rel.ts  resolved against FILE's URL path
- /npm:pkg@1?dew       looked up verbatim in FILE's origin manifest
- https://host/path    looked up in that host's manifest

Bare specifiers never resolve.

Example:
    modcache resolve <FILE> ./util.ts https://deno.land/std/fs/mod.ts
"#
    )]
    Resolve {
        /// The importing cached file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Specifiers to resolve.
        #[arg(value_name = "SPECIFIER", required = true, num_args = 1..)]
        specifiers: Vec<String>,
    },

    /// Find the cached file for fully-qualified URLs.
    #[command(long_about = "Find the cached file for each http(s) URL.\n\n\
Example:\n\
  modcache lookup https://deno.land/std/path/mod.ts\n")]
    Lookup {
        /// URLs to look up.
        #[arg(value_name = "URL", required = true, num_args = 1..)]
        urls: Vec<String>,
    },

    /// List every module in the cache.
    #[command(long_about = "List cached modules whose file is present, sorted by URL.\n\n\
Examples:\n\
  modcache list\n\
  modcache list --origin deno.land\n")]
    List {
        /// Keep only origins containing this text.
        #[arg(long, value_name = "FILTER")]
        origin: Option<String>,
    },

    /// List origins and whether their manifest loads.
    Origins,

    /// Follow imports from a cached module.
    #[command(
        long_about = r#"Walk the imports of FILE through the cache, breadth first.

Output formats:
- jsonl (default) / json: one graph item per module
- dot: Graphviz DOT
- mermaid: Mermaid flowchart
- tree: ASCII tree (repeated modules marked with (*))

Example:
    modcache graph <FILE> --graph-format dot | dot -Tpng -o graph.png
"#
    )]
    Graph {
        /// Root cached file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum import depth to expand.
        #[arg(long, default_value = "16", value_name = "N")]
        max_depth: usize,

        /// Output format for the graph (jsonl/json/dot/mermaid/tree).
        #[arg(long = "graph-format", value_name = "FORMAT", default_value = "jsonl")]
        graph_format: String,
    },

    /// Check the cache location and manifests.
    #[command(long_about = "Report which cache root is used, whether it exists, and which\n\
origin manifests fail to load.\n\n\
Example:\n\
  modcache doctor\n")]
    Doctor,
}

impl Cli {
    /// Build the resolver from --cache-root, --deno-dir or the environment.
    ///
    /// Relative directories are taken against the current directory, the
    /// same way FILE arguments are.
    pub fn resolver(&self) -> Result<Resolver> {
        if let Some(root) = &self.cache_root {
            return Ok(Resolver::with_root(absolute(root)?));
        }
        if let Some(dir) = &self.deno_dir {
            return Ok(Resolver::new(DenoDir::new(absolute(dir)?), FsManifestLoader));
        }
        Resolver::from_env().context("Failed to locate the module cache")
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let resolver = cli.resolver()?;

    match cli.command {
        Commands::Info {
            file,
            source,
            max_bytes,
        } => crate::commands::info::run_info(&resolver, &file, source, max_bytes, render_config),

        Commands::Resolve { file, specifiers } => {
            crate::commands::resolve::run_resolve(&resolver, &file, &specifiers, render_config)
        }

        Commands::Lookup { urls } => {
            crate::commands::resolve::run_lookup(&resolver, &urls, render_config)
        }

        Commands::List { origin } => {
            crate::commands::list::run_list(&resolver, origin.as_deref(), render_config)
        }

        Commands::Origins => crate::commands::list::run_origins(&resolver, render_config),

        Commands::Graph {
            file,
            max_depth,
            graph_format,
        } => {
            let graph_fmt: modcache::graph::GraphFormat = graph_format.parse().unwrap_or_default();
            crate::commands::graph::run_graph(&resolver, &file, max_depth, graph_fmt, render_config)
        }

        Commands::Doctor => crate::commands::doctor::run_doctor(&resolver, render_config),
    }
}
