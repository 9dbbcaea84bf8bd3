//! Delimited file-block extraction
//!
//! ```text
//! ---FILE: src/App.tsx---
//! <content>
//! ---END FILE---
//! ```

use livecraft_types::ParsedFile;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static FILE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)---FILE:[ \t]*([^\n]+?)---\r?\n(.*?)---END FILE---")
        .expect("valid file block regex")
});

/// Normalize a block path: trim, drop empty and `.` segments.
pub fn normalize_path(raw: &str) -> String {
    raw.trim()
        .split('/')
        .map(str::trim)
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Extract every complete file block from `text`.
///
/// Unterminated trailing blocks are absent. When a path appears twice the
/// later block wins but keeps the position of the first.
pub fn parse_file_blocks(text: &str) -> Vec<ParsedFile> {
    let mut files: Vec<ParsedFile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for caps in FILE_BLOCK.captures_iter(text) {
        let path = normalize_path(&caps[1]);
        if path.is_empty() {
            tracing::debug!("Skipping file block with empty path");
            continue;
        }
        let content = caps[2].trim_end();
        let file = ParsedFile::new(path.clone(), content);

        match index.get(&path) {
            Some(&i) => files[i] = file,
            None => {
                index.insert(path, files.len());
                files.push(file);
            }
        }
    }

    files
}

/// Remove the delimited spans from `text`, leaving the prose
pub fn strip_file_blocks(text: &str) -> String {
    FILE_BLOCK.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use livecraft_types::Language;

    #[test]
    fn test_parses_complete_blocks() {
        let text = "Here you go:\n---FILE: src/App.tsx---\nexport default function App() {}\n\n---END FILE---\nand\n---FILE:  styles.css ---\nbody {}\n---END FILE---";
        let files = parse_file_blocks(text);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "src/App.tsx");
        assert_eq!(files[0].content, "export default function App() {}");
        assert_eq!(files[0].language, Language::Tsx);
        assert_eq!(files[1].path, "styles.css");
        assert_eq!(files[1].language, Language::Css);
    }

    #[test]
    fn test_unterminated_block_is_absent() {
        let text = "---FILE: a.ts---\nconst a = 1;\n---END FILE---\n---FILE: b.ts---\nconst b";
        let files = parse_file_blocks(text);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.ts");
    }

    #[test]
    fn test_reparse_of_extended_buffer_is_superset() {
        let full = "intro\n---FILE: a.ts---\nA\n---END FILE---\n---FILE: b.ts---\nB\n---END FILE---\n";
        let mut previous: Vec<ParsedFile> = Vec::new();
        for end in 0..=full.len() {
            if !full.is_char_boundary(end) {
                continue;
            }
            let current = parse_file_blocks(&full[..end]);
            assert!(current.len() >= previous.len());
            assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current;
        }
        assert_eq!(previous.len(), 2);
        assert_eq!(parse_file_blocks(full), parse_file_blocks(full));
    }

    #[test]
    fn test_duplicate_path_later_wins() {
        let text = "---FILE: a.ts---\nv1\n---END FILE---\n---FILE: b.ts---\nb\n---END FILE---\n---FILE: ./a.ts---\nv2\n---END FILE---";
        let files = parse_file_blocks(text);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "a.ts");
        assert_eq!(files[0].content, "v2");
        assert_eq!(files[1].path, "b.ts");
    }

    #[test]
    fn test_empty_path_and_no_blocks() {
        assert!(parse_file_blocks("---FILE: / ---\nx\n---END FILE---").is_empty());
        assert!(parse_file_blocks("just prose, no files").is_empty());
    }

    #[test]
    fn test_strip_file_blocks() {
        let text = "Before\n---FILE: a.ts---\nx\n---END FILE---\nAfter\n";
        assert_eq!(strip_file_blocks(text), "Before\n\nAfter");
        assert_eq!(strip_file_blocks("  plain  "), "plain");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(" ./src//components/Button.tsx "), "src/components/Button.tsx");
        assert_eq!(normalize_path("/"), "");
    }
}
