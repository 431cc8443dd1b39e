//! Graph - follow imports from a cached module

use anyhow::Result;
use std::path::Path;

use modcache::cache::Resolver;
use modcache::core::model::ResultSet;
use modcache::core::render::{OutputFormat, RenderConfig};
use modcache::graph::{GraphFormat, ModuleGraph};

use super::{not_a_module, open_module, print};

/// Run the graph command
pub fn run_graph(
    resolver: &Resolver,
    file: &Path,
    max_depth: usize,
    format: GraphFormat,
    config: RenderConfig,
) -> Result<()> {
    let (path, module) = open_module(resolver, file)?;

    let Some(module) = module else {
        let mut result_set = ResultSet::new();
        result_set.push(not_a_module(&path, resolver));
        print(&result_set, config);
        return Ok(());
    };

    let graph = ModuleGraph::build(&module, max_depth);

    match format {
        GraphFormat::Dot => println!("{}", graph.format_dot()),
        GraphFormat::Mermaid => println!("{}", graph.format_mermaid()),
        GraphFormat::Tree => print!("{}", graph.format_tree()),
        GraphFormat::Jsonl => print(&graph.to_result_set(), config),
        GraphFormat::Json => print(
            &graph.to_result_set(),
            RenderConfig::with_pretty(OutputFormat::Json, config.pretty),
        ),
    }

    Ok(())
}
