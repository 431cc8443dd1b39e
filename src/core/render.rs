//! Renderer module
//!
//! Turns a ResultSet into jsonl, json, markdown or raw text

use crate::core::model::{Kind, ResultItem, ResultSet};
use serde::Serialize;
use std::fmt::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            "raw" => Ok(Self::Raw),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

/// Output format plus pretty-printing switch
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_pretty(format, false)
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Markdown sections in output order
const SECTIONS: [(Kind, &str); 6] = [
    (Kind::Error, "Errors"),
    (Kind::Status, "Status"),
    (Kind::Module, "Modules"),
    (Kind::Origin, "Origins"),
    (Kind::Unresolved, "Unresolved"),
    (Kind::Graph, "Module Graph"),
];

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_config(RenderConfig::new(format))
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string (no trailing newline)
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => {
                let separator = if self.config.pretty { "\n\n" } else { "\n" };
                result_set
                    .items
                    .iter()
                    .filter_map(|item| self.to_json(item))
                    .collect::<Vec<_>>()
                    .join(separator)
            }
            OutputFormat::Json => self
                .to_json(&result_set.items)
                .unwrap_or_else(|| "[]".to_string()),
            OutputFormat::Markdown => render_markdown(result_set),
            OutputFormat::Raw => result_set
                .items
                .iter()
                .filter_map(|item| item.excerpt.as_deref().or(item.url.as_deref()))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Option<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.ok()
    }
}

fn render_markdown(result_set: &ResultSet) -> String {
    let mut out = String::new();

    for (kind, title) in SECTIONS {
        let items: Vec<&ResultItem> = result_set
            .items
            .iter()
            .filter(|item| item.kind == kind)
            .collect();
        if items.is_empty() {
            continue;
        }

        let _ = writeln!(out, "## {}\n", title);
        for item in items {
            match kind {
                Kind::Error => {
                    for error in &item.errors {
                        let _ = writeln!(out, "- **{}**: {}", error.code, error.message);
                    }
                }
                Kind::Status => {
                    if let Some(line) = &item.excerpt {
                        let _ = writeln!(out, "- {}", line);
                    }
                }
                Kind::Origin => {
                    let _ = writeln!(
                        out,
                        "- `{}` → `{}`",
                        item.url.as_deref().unwrap_or("?"),
                        item.path.as_deref().unwrap_or("?")
                    );
                }
                Kind::Unresolved => {
                    if let Some(specifier) = &item.specifier {
                        let _ = writeln!(out, "- `{}`", specifier);
                    }
                }
                Kind::Module | Kind::Graph => module_block(&mut out, item),
            }
        }
        out.push('\n');
    }

    out
}

/// Heading plus details for a module or graph node
fn module_block(out: &mut String, item: &ResultItem) {
    if let Some(url) = &item.url {
        let _ = writeln!(out, "### `{}`\n", url);
    }
    if let Some(specifier) = &item.specifier {
        let _ = writeln!(out, "- specifier: `{}`", specifier);
    }
    if let Some(path) = &item.path {
        match item.meta.size {
            Some(size) => {
                let _ = writeln!(out, "- path: `{}` ({} bytes)", path, size);
            }
            None => {
                let _ = writeln!(out, "- path: `{}`", path);
            }
        }
    }
    for error in &item.errors {
        let _ = writeln!(out, "- error **{}**: {}", error.code, error.message);
    }
    if let Some(data) = &item.data {
        let pretty = serde_json::to_string_pretty(data).unwrap_or_default();
        let _ = writeln!(out, "\n```json\n{}\n```", pretty);
    }
    if let Some(excerpt) = &item.excerpt {
        let _ = writeln!(out, "\n```\n{}\n```", excerpt.trim_end_matches('\n'));
        if item.meta.truncated {
            out.push_str("\n> source truncated\n");
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CacheError;

    fn sample() -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::origin("https://deno.land", "/c/https/deno.land"));
        result_set.push(ResultItem::unresolved("lodash"));
        result_set
    }

    #[test]
    fn test_jsonl_one_line_per_item() {
        let output = Renderer::new(OutputFormat::Jsonl).render(&sample());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"kind\":\"origin\""));
        assert!(lines[1].contains("lodash"));
    }

    #[test]
    fn test_jsonl_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Jsonl, true);
        let output = Renderer::with_config(config).render(&sample());
        assert!(output.contains("\n  \"kind\""));
        assert!(output.contains("}\n\n{"));
    }

    #[test]
    fn test_json_array() {
        let output = Renderer::new(OutputFormat::Json).render(&sample());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(Renderer::new(OutputFormat::Json).render(&ResultSet::new()), "[]");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>(), Ok(OutputFormat::Jsonl));
        assert_eq!("ndjson".parse::<OutputFormat>(), Ok(OutputFormat::Jsonl));
        assert_eq!("Markdown".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("RAW".parse::<OutputFormat>(), Ok(OutputFormat::Raw));
        assert!("yaml"
            .parse::<OutputFormat>()
            .unwrap_err()
            .contains("Unknown format"));
    }

    #[test]
    fn test_markdown_empty() {
        assert!(Renderer::new(OutputFormat::Markdown)
            .render(&ResultSet::new())
            .is_empty());
    }

    #[test]
    fn test_markdown_section_order() {
        let mut result_set = sample();
        result_set.push(ResultItem::error(CacheError::new("TEST_ERROR", "boom")));
        result_set.push(ResultItem::graph(
            "https://deno.land/std/mod.ts",
            serde_json::json!({ "depends_on": ["https://deno.land/std/a.ts"] }),
        ));

        let output = Renderer::new(OutputFormat::Markdown).render(&result_set);
        let errors = output.find("## Errors").unwrap();
        let origins = output.find("## Origins").unwrap();
        let unresolved = output.find("## Unresolved").unwrap();
        let graph = output.find("## Module Graph").unwrap();
        assert!(errors < origins && origins < unresolved && unresolved < graph);

        assert!(output.contains("- **TEST_ERROR**: boom"));
        assert!(output.contains("- `https://deno.land` → `/c/https/deno.land`"));
        assert!(output.contains("- `lodash`"));
        assert!(output.contains("\"depends_on\""));
    }

    #[test]
    fn test_raw_prefers_excerpt() {
        let mut result_set = ResultSet::new();
        let mut item = ResultItem::origin("https://a.com", "/c/https/a.com");
        item.excerpt = Some("source".to_string());
        result_set.push(item);
        result_set.push(ResultItem::origin("https://b.com", "/c/https/b.com"));
        result_set.push(ResultItem::unresolved("x"));

        let output = Renderer::new(OutputFormat::Raw).render(&result_set);
        assert_eq!(output, "source\nhttps://b.com");
    }
}
