//! Import specifier extraction from JavaScript/TypeScript source
//!
//! Regex based: good enough for the static shapes Deno modules use, no
//! attempt at a real parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `import x from '...'`, `import { a,\n b } from "..."`, `export * from '...'`
static FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bfrom\s*["']([^"'\n]+)["']"#).expect("Invalid FROM_RE regex"));

/// `import '...'`
static SIDE_EFFECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s*["']([^"'\n]+)["']"#).expect("Invalid SIDE_EFFECT_RE regex")
});

/// `import('...')` with a string literal argument
static DYNAMIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\(\s*["']([^"'\n]+)["']\s*\)"#).expect("Invalid DYNAMIC_RE regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Static,
    SideEffect,
    Dynamic,
}

/// One import found in a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    pub specifier: String,
    /// 1-based line of the specifier
    pub line: u32,
    pub kind: ImportKind,
}

/// Extract import specifiers in source order
pub fn extract_imports(source: &str) -> Vec<ImportRef> {
    let mut found: Vec<(usize, ImportRef)> = Vec::new();

    for (re, kind) in [
        (&*FROM_RE, ImportKind::Static),
        (&*SIDE_EFFECT_RE, ImportKind::SideEffect),
        (&*DYNAMIC_RE, ImportKind::Dynamic),
    ] {
        for caps in re.captures_iter(source) {
            let Some(m) = caps.get(1) else { continue };
            if in_comment(source, m.start()) {
                continue;
            }
            found.push((
                m.start(),
                ImportRef {
                    specifier: m.as_str().to_string(),
                    line: line_of(source, m.start()),
                    kind,
                },
            ));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.dedup_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, import)| import).collect()
}

fn line_of(source: &str, offset: usize) -> u32 {
    source[..offset].bytes().filter(|b| *b == b'\n').count() as u32 + 1
}

/// Whether the line holding `offset` is a line or block comment line
fn in_comment(source: &str, offset: usize) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = source[line_start..offset].trim_start();
    line.starts_with("//") || line.starts_with("/*") || line.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(source: &str) -> Vec<String> {
        extract_imports(source)
            .into_iter()
            .map(|i| i.specifier)
            .collect()
    }

    #[test]
    fn test_static_imports() {
        let source = r#"import { join } from "./path/mod.ts";
import * as fs from 'https://deno.land/std/fs/mod.ts';
export { serve } from "../http/server.ts";
export * from "/npm:tough-cookie@3?dew";
"#;
        assert_eq!(
            specifiers(source),
            vec![
                "./path/mod.ts",
                "https://deno.land/std/fs/mod.ts",
                "../http/server.ts",
                "/npm:tough-cookie@3?dew"
            ]
        );
    }

    #[test]
    fn test_multiline_import() {
        let source = "import {\n  a,\n  b,\n} from \"./ab.ts\";\n";
        let imports = extract_imports(source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "./ab.ts");
        assert_eq!(imports[0].line, 4);
        assert_eq!(imports[0].kind, ImportKind::Static);
    }

    #[test]
    fn test_side_effect_and_dynamic() {
        let source = "import \"./polyfill.ts\";\nconst m = await import('./lazy.ts');\n";
        let imports = extract_imports(source);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].kind, ImportKind::SideEffect);
        assert_eq!(imports[0].line, 1);
        assert_eq!(imports[1].kind, ImportKind::Dynamic);
        assert_eq!(imports[1].specifier, "./lazy.ts");
        assert_eq!(imports[1].line, 2);
    }

    #[test]
    fn test_comments_skipped() {
        let source = "// import x from \"./old.ts\";\n/**\n * import y from './doc.ts'\n */\nimport z from './z.ts';\n";
        assert_eq!(specifiers(source), vec!["./z.ts"]);
    }

    #[test]
    fn test_dynamic_non_literal_skipped() {
        assert!(extract_imports("const m = await import(name);").is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(extract_imports("export const x = 1;\n").is_empty());
    }
}
