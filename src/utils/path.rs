//! Filename sanitation and size helpers

/// Characters that are invalid in filenames on at least one supported OS.
const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitize a string into a filesystem-safe name.
///
/// Invalid characters become `_`, non-ASCII characters are dropped (no
/// transliteration), leading/trailing dots and spaces are stripped, and
/// runs of whitespace/underscores collapse into a single `_`. An empty
/// result becomes `"unnamed"`; the output is hard-truncated to
/// `max_length` characters.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let ascii: String = name.chars().filter(|c| c.is_ascii()).collect();
    let trimmed = ascii.trim_matches(|c| c == '.' || c == ' ');

    // Collapse separator runs present in the input before replacing invalid
    // characters, so replacements stay visible one-for-one (`a<>b` keeps
    // both underscores).
    let mut collapsed = String::with_capacity(trimmed.len());
    let mut in_separator = false;
    for c in trimmed.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_separator {
                collapsed.push('_');
                in_separator = true;
            }
        } else {
            collapsed.push(if INVALID_CHARS.contains(&c) { '_' } else { c });
            in_separator = false;
        }
    }

    if collapsed.is_empty() {
        return "unnamed".to_string();
    }

    collapsed.chars().take(max_length).collect()
}

/// Default maximum length for sanitized filenames.
pub const DEFAULT_MAX_FILENAME_LEN: usize = 100;

/// Estimate output file size in bytes from duration and bitrate.
pub fn estimate_file_size(duration_seconds: f64, bitrate_bps: u64) -> u64 {
    (duration_seconds * bitrate_bps as f64 / 8.0) as u64
}

/// Convert a byte count to a human-readable string.
pub fn human_readable_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_invalid_characters() {
        assert_eq!(sanitize_filename("test<>file", 100), "test__file");
        assert_eq!(sanitize_filename("a/b\\c:d", 100), "a_b_c_d");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(sanitize_filename("file with spaces", 100), "file_with_spaces");
        assert_eq!(sanitize_filename("a  __  b", 100), "a_b");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(sanitize_filename("café", 100), "caf");
        assert_eq!(sanitize_filename("日本語", 100), "unnamed");
    }

    #[test]
    fn strips_leading_trailing_dots_and_spaces() {
        assert_eq!(sanitize_filename("  .hidden. ", 100), "hidden");
    }

    #[test]
    fn empty_input_becomes_unnamed() {
        assert_eq!(sanitize_filename("", 100), "unnamed");
        assert_eq!(sanitize_filename("...", 100), "unnamed");
    }

    #[test]
    fn truncates_to_max_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_filename(&long, 100).len(), 100);
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_readable_size(512), "512.0 B");
        assert_eq!(human_readable_size(2048), "2.0 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn size_estimate() {
        assert_eq!(estimate_file_size(10.0, 8_000_000), 10_000_000);
    }
}
