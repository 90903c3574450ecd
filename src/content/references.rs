//! Asset-reference extraction.
//!
//! Finds every asset filename a note links to, across the syntaxes the
//! export emits: inline images, reference-style images, reference
//! definitions, and raw HTML `img`/`a` tags. Captured paths are reduced to
//! their final filename component and percent-decoded, so
//! `![x](Files/image%206.png)` yields `image 6.png`.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

/// Reference patterns with the index of the path-bearing capture group.
fn reference_patterns() -> Vec<(Regex, usize)> {
    vec![
        // ![alt](path)
        (Regex::new(r"(?i)!\[[^\]]*\]\(([^)]+)\)").unwrap(), 1),
        // ![alt][ref]
        (Regex::new(r"(?i)!\[[^\]]*\]\[([^\]]+)\]").unwrap(), 1),
        // [ref]: path
        (Regex::new(r"(?im)^\s*\[([^\]]+)\]:\s*(\S+)").unwrap(), 2),
        // <img src="path">
        (
            Regex::new(r#"(?i)<img[^>]*src\s*=\s*["']([^"']+)["']"#).unwrap(),
            1,
        ),
        // <a href="path">
        (
            Regex::new(r#"(?i)<a[^>]*href\s*=\s*["']([^"']+)["']"#).unwrap(),
            1,
        ),
    ]
}

/// Extract the set of asset filenames referenced by `text`.
///
/// Filenames are stored lowercased, so two references differing only in
/// case count once. The result is a set; no ordering is guaranteed.
pub fn extract_references(text: &str) -> HashSet<String> {
    let mut names = HashSet::new();

    for (re, group) in reference_patterns() {
        for caps in re.captures_iter(text) {
            let Some(token) = caps.get(group) else {
                continue;
            };
            if let Some(name) = reference_filename(token.as_str()) {
                names.insert(name.to_lowercase());
            }
        }
    }

    names
}

/// Reduce a captured path token to its percent-decoded final filename.
///
/// `"Files/image%206.png"` -> `Some("image 6.png")`
fn reference_filename(token: &str) -> Option<String> {
    let token = token.trim();
    // Drop an optional markdown title: (path "title")
    let token = token.split_whitespace().next()?;
    // Ignore query/fragment suffixes
    let token = token.split(['?', '#']).next()?;

    let filename = Path::new(token)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())?;

    if filename.is_empty() {
        return None;
    }

    // Keep the raw name if percent-decoding fails
    let decoded = urlencoding::decode(&filename)
        .map(|s| s.into_owned())
        .unwrap_or(filename);

    Some(decoded)
}
