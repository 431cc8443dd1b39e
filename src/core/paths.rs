//! Path utilities
//!
//! Filesystem paths inside the cache are compared component-wise. URL paths
//! are always '/'-separated regardless of platform.

use std::path::{Component, Path};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Components of `path` below `root`, or `None` if `path` is not under `root`.
///
/// The comparison is done per component, so `/cache2/x` is not under `/cache`.
pub fn components_under(path: &Path, root: &Path) -> Option<Vec<String>> {
    let rest = path.strip_prefix(root).ok()?;
    rest.components()
        .map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Derive the `scheme://host` origin for an origin directory.
///
/// `<root>/https/deno.land` becomes `https://deno.land`. Any further
/// components are appended with '/'.
pub fn origin_from_dir(origin_dir: &Path, root: &Path) -> Option<String> {
    let segments = components_under(origin_dir, root)?;
    let (scheme, rest) = segments.split_first()?;
    if rest.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, rest.join("/")))
}

/// Directory part of a '/'-separated URL path.
pub fn posix_dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Resolve `relative` against the absolute URL path `base` with POSIX rules.
///
/// `.` segments are dropped, `..` pops one segment but never climbs above
/// `/`, empty segments are collapsed and the result has no trailing slash.
pub fn posix_resolve(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if !relative.starts_with('/') {
        for seg in base.split('/') {
            push_segment(&mut segments, seg);
        }
    }

    for seg in relative.split('/') {
        push_segment(&mut segments, seg);
    }

    format!("/{}", segments.join("/"))
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, seg: &'a str) {
    match seg {
        "" | "." => {}
        ".." => {
            segments.pop();
        }
        other => segments.push(other),
    }
}

/// The last component of a path as a string, if it is a normal file name
pub fn file_name_str(path: &Path) -> Option<&str> {
    match path.components().next_back()? {
        Component::Normal(name) => name.to_str(),
        _ => None,
    }
}
