//! Common utilities

use std::path::Path;
use std::time::SystemTime;

/// Get file modification time in milliseconds since epoch
pub fn get_mtime_ms(path: &Path) -> std::io::Result<i64> {
    let metadata = std::fs::metadata(path)?;
    let mtime = metadata.modified()?;
    let duration = mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(duration.as_millis() as i64)
}

/// Get file size in bytes
pub fn get_file_size(path: &Path) -> std::io::Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len())
}

/// Truncate string to max bytes, returning (truncated_string, was_truncated)
pub fn truncate_string(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    // Find a valid UTF-8 boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (s[..end].to_string(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_and_mtime() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("mod.ts");
        std::fs::write(&file, "export {};\n").unwrap();

        assert_eq!(get_file_size(&file).unwrap(), 11);
        assert!(get_mtime_ms(&file).unwrap() > 0);
    }

    #[test]
    fn test_file_size_missing() {
        let temp = tempfile::tempdir().unwrap();
        assert!(get_file_size(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_truncate_string() {
        let s = "hello world";
        let (truncated, was_truncated) = truncate_string(s, 5);
        assert_eq!(truncated, "hello");
        assert!(was_truncated);

        let (not_truncated, was_truncated) = truncate_string(s, 100);
        assert_eq!(not_truncated, s);
        assert!(!was_truncated);
    }

    #[test]
    fn test_truncate_string_utf8() {
        let s = "你好世界";
        let (truncated, _) = truncate_string(s, 6);
        assert_eq!(truncated, "你好"); // Each Chinese char is 3 bytes
    }
}
