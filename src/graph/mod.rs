//! Module graph
//!
//! Follows the imports of a cached module through [`CacheModule::resolve_module`]
//! to answer "what does this module pull in from the cache" and "what in the
//! cache imports this module".

pub mod imports;

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::module::CacheModule;
use crate::core::model::{CacheError, ResultItem, ResultSet};
use crate::core::paths::normalize_path;
use imports::{extract_imports, ImportKind};

/// One import edge out of a module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub specifier: String,
    pub line: u32,
    pub kind: ImportKind,
    /// URL of the target module, `None` when it is not in the cache
    pub resolved: Option<String>,
}

/// A module in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub url: String,
    pub filepath: PathBuf,
    /// Distance from the root module
    pub depth: usize,
    pub depends_on: Vec<Edge>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depended_by: Vec<String>,
    /// Set when the module source could not be read
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub read_error: Option<String>,
}

/// The import graph reachable from one root module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleGraph {
    pub root: String,
    /// URL -> node
    pub nodes: BTreeMap<String, GraphNode>,
}

impl ModuleGraph {
    /// Breadth-first walk from `root`.
    ///
    /// Modules deeper than `max_depth` are referenced by their parent's edges
    /// but not expanded into nodes.
    pub fn build(root: &CacheModule, max_depth: usize) -> Self {
        let mut graph = ModuleGraph {
            root: root.url().to_string(),
            nodes: BTreeMap::new(),
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(CacheModule, usize)> = VecDeque::new();

        seen.insert(root.url().to_string());
        queue.push_back((root.clone(), 0));

        while let Some((module, depth)) = queue.pop_front() {
            let mut node = GraphNode {
                url: module.url().to_string(),
                filepath: module.filepath().to_path_buf(),
                depth,
                depends_on: Vec::new(),
                depended_by: Vec::new(),
                read_error: None,
            };

            match std::fs::read_to_string(module.filepath()) {
                Ok(source) => {
                    for import in extract_imports(&source) {
                        let target = module.resolve_module(&import.specifier);
                        if let Some(target) = &target {
                            if depth < max_depth && seen.insert(target.url().to_string()) {
                                queue.push_back((target.clone(), depth + 1));
                            }
                        }
                        node.depends_on.push(Edge {
                            specifier: import.specifier,
                            line: import.line,
                            kind: import.kind,
                            resolved: target.map(|t| t.url().to_string()),
                        });
                    }
                }
                Err(e) => {
                    debug!("Cannot read {}: {}", module.filepath().display(), e);
                    node.read_error = Some(e.to_string());
                }
            }

            graph.nodes.insert(node.url.clone(), node);
        }

        graph.build_reverse_deps();
        graph
    }

    /// Populate `depended_by` from the forward edges
    fn build_reverse_deps(&mut self) {
        let mut reverse_map: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (source, node) in &self.nodes {
            for target in node.depends_on.iter().filter_map(|e| e.resolved.as_ref()) {
                reverse_map
                    .entry(target.clone())
                    .or_default()
                    .push(source.clone());
            }
        }

        for (url, mut deps) in reverse_map {
            if let Some(node) = self.nodes.get_mut(&url) {
                deps.sort();
                deps.dedup();
                node.depended_by = deps;
            }
        }
    }

    /// Resolved URLs a module imports, sorted and deduplicated
    pub fn dependencies(&self, url: &str) -> Vec<String> {
        self.nodes
            .get(url)
            .map(|node| {
                let mut deps: Vec<String> = node
                    .depends_on
                    .iter()
                    .filter_map(|e| e.resolved.clone())
                    .collect();
                deps.sort();
                deps.dedup();
                deps
            })
            .unwrap_or_default()
    }

    /// Modules in the graph importing `url`
    pub fn dependents(&self, url: &str) -> Vec<String> {
        self.nodes
            .get(url)
            .map(|node| node.depended_by.clone())
            .unwrap_or_default()
    }

    /// (importing module URL, specifier) for every import that did not resolve
    pub fn unresolved(&self) -> Vec<(&str, &str)> {
        self.nodes
            .values()
            .flat_map(|node| {
                node.depends_on
                    .iter()
                    .filter(|e| e.resolved.is_none())
                    .map(move |e| (node.url.as_str(), e.specifier.as_str()))
            })
            .collect()
    }

    /// Detect import cycles
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for url in self.nodes.keys() {
            if !visited.contains(url) {
                self.dfs_cycle(url, &mut visited, &mut rec_stack, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_cycle(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node.to_string());
        rec_stack.insert(node.to_string());
        path.push(node.to_string());

        for dep in self.dependencies(node) {
            if !visited.contains(&dep) {
                self.dfs_cycle(&dep, visited, rec_stack, path, cycles);
            } else if rec_stack.contains(&dep) {
                let cycle_start = path.iter().position(|p| p == &dep).unwrap_or(0);
                cycles.push(path[cycle_start..].to_vec());
            }
        }

        path.pop();
        rec_stack.remove(node);
    }

    /// Convert the graph to the unified result model
    pub fn to_result_set(&self) -> ResultSet {
        let mut result_set = ResultSet::new();

        for cycle in self.find_cycles() {
            let mut item = ResultItem::error(CacheError::new(
                "CIRCULAR_IMPORT",
                format!("Circular import: {}", cycle.join(" -> ")),
            ));
            item.url = cycle.first().cloned();
            result_set.push(item.with_data(serde_json::json!({ "cycle": cycle })));
        }

        for node in self.nodes.values() {
            let unresolved: Vec<&str> = node
                .depends_on
                .iter()
                .filter(|e| e.resolved.is_none())
                .map(|e| e.specifier.as_str())
                .collect();

            let mut item = ResultItem::graph(
                &node.url,
                serde_json::json!({
                    "depth": node.depth,
                    "depends_on": self.dependencies(&node.url),
                    "depended_by": node.depended_by,
                    "unresolved": unresolved,
                }),
            );
            item.path = Some(normalize_path(&node.filepath));
            if let Some(e) = &node.read_error {
                item = item.with_error(CacheError::new("READ_FAILED", e.clone()));
            }
            result_set.push(item);
        }

        result_set
    }

    /// Graphviz DOT
    pub fn format_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph modules {\n");
        output.push_str("    rankdir=LR;\n");
        output.push_str("    node [shape=box, style=rounded];\n\n");

        for url in self.nodes.keys() {
            output.push_str(&format!(
                "    \"{}\" [label=\"{}\"];\n",
                dot_escape(url),
                dot_escape(short_label(url))
            ));
        }

        output.push('\n');

        for url in self.nodes.keys() {
            for dep in self.dependencies(url) {
                if self.nodes.contains_key(&dep) {
                    output.push_str(&format!(
                        "    \"{}\" -> \"{}\";\n",
                        dot_escape(url),
                        dot_escape(&dep)
                    ));
                }
            }
        }

        output.push_str("}\n");
        output
    }

    /// Mermaid flowchart
    pub fn format_mermaid(&self) -> String {
        let mut output = String::new();
        output.push_str("graph LR\n");

        // Mermaid node IDs can't have special chars
        let ids: BTreeMap<&str, String> = self
            .nodes
            .keys()
            .enumerate()
            .map(|(idx, url)| (url.as_str(), format!("N{}", idx)))
            .collect();

        for (url, id) in &ids {
            output.push_str(&format!("    {}[\"{}\"]\n", id, mermaid_escape(short_label(url))));
        }

        for (url, from_id) in &ids {
            for dep in self.dependencies(url) {
                if let Some(to_id) = ids.get(dep.as_str()) {
                    output.push_str(&format!("    {} --> {}\n", from_id, to_id));
                }
            }
        }

        output
    }

    /// ASCII tree from the root; repeated modules are shown once and marked
    pub fn format_tree(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", self.root));
        let mut expanded = HashSet::new();
        expanded.insert(self.root.clone());
        self.tree_children(&self.root, "", &mut expanded, &mut output);
        output
    }

    fn tree_children(
        &self,
        url: &str,
        prefix: &str,
        expanded: &mut HashSet<String>,
        output: &mut String,
    ) {
        let deps = self.dependencies(url);
        for (idx, dep) in deps.iter().enumerate() {
            let is_last = idx == deps.len() - 1;
            let branch = if is_last { "└── " } else { "├── " };
            let first_visit = expanded.insert(dep.clone());
            let marker = if first_visit { "" } else { " (*)" };
            output.push_str(&format!("{}{}{}{}\n", prefix, branch, dep, marker));

            if first_visit {
                let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                self.tree_children(dep, &child_prefix, expanded, output);
            }
        }
    }
}

fn short_label(url: &str) -> &str {
    url.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(url)
}

/// Quote-safe text for a DOT string literal
fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote-safe text for a Mermaid node label
fn mermaid_escape(s: &str) -> String {
    s.replace('"', "#quot;")
}

/// Output format for the graph command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    #[default]
    Jsonl,
    Json,
    Dot,
    Mermaid,
    Tree,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(GraphFormat::Jsonl),
            "json" => Ok(GraphFormat::Json),
            "dot" | "graphviz" => Ok(GraphFormat::Dot),
            "mermaid" | "mmd" => Ok(GraphFormat::Mermaid),
            "tree" => Ok(GraphFormat::Tree),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}
