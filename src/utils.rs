//! Shared utility functions

/// Safely truncate a string at a UTF-8 boundary
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if max_bytes >= s.len() { return s; }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Last path component, or the whole string when there is none
pub fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_safe_truncate_ascii() {
        assert_eq!(safe_truncate("resume.pdf", 6), "resume");
        assert_eq!(safe_truncate("resume.pdf", 40), "resume.pdf");
    }

    #[test]
    fn test_safe_truncate_utf8() {
        // "é" is two bytes; cutting inside it backs off to the previous boundary
        assert_eq!(safe_truncate("café.pdf", 4), "caf");
        assert_eq!(safe_truncate("café.pdf", 5), "café");
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("/tmp/docs/cv.pdf")), "cv.pdf");
        assert_eq!(file_name_of(Path::new("/")), "/");
    }
}
