//! Category path resolution against a notebook tree.
//!
//! Externally-authored category names and locally-created folder names
//! drift: extra punctuation, dash variants, slightly different wording. An
//! exact-only match would orphan large fractions of notes, so each segment
//! is matched in three tiers of decreasing strictness. Ties always break by
//! first match in child iteration order; there is no scoring.

use crate::error::{ConvertError, Result};
use crate::hierarchy::tree::{split_segments, TreeNode};

/// Resolve a category path to its node in the tree.
pub fn resolve<'t>(tree: &'t TreeNode, category_path: &str) -> Result<&'t TreeNode> {
    let chain = resolve_chain(tree, category_path)?;
    Ok(chain.last().copied().unwrap_or(tree))
}

/// Resolve a category path, returning every node descended through (root
/// excluded). The final element is the resolution result; the chain gives
/// callers the actual folder labels to build an output path from.
pub fn resolve_chain<'t>(tree: &'t TreeNode, category_path: &str) -> Result<Vec<&'t TreeNode>> {
    let mut node = tree;
    let mut chain = Vec::new();

    for segment in split_segments(category_path) {
        node = match_child(node, segment).ok_or_else(|| ConvertError::Unresolved {
            path: category_path.to_string(),
            segment: segment.to_string(),
        })?;
        chain.push(node);
    }
    Ok(chain)
}

/// Match one segment against a node's children, tier by tier.
fn match_child<'t>(node: &'t TreeNode, segment: &str) -> Option<&'t TreeNode> {
    // Tier 1: exact, case-insensitive
    let lower = segment.to_lowercase();
    if let Some(child) = node.children.iter().find(|c| c.label.to_lowercase() == lower) {
        log::debug!("segment '{}' matched '{}' exactly", segment, child.label);
        return Some(child);
    }

    // Tier 2: punctuation-normalized equality
    let normalized = normalize_label(segment);
    if let Some(child) = node
        .children
        .iter()
        .find(|c| normalize_label(&c.label) == normalized)
    {
        log::debug!("segment '{}' matched '{}' normalized", segment, child.label);
        return Some(child);
    }

    // Tier 3: normalized substring containment, either direction
    let child = node.children.iter().find(|c| {
        let label = normalize_label(&c.label);
        label.contains(&normalized) || normalized.contains(&label)
    });
    if let Some(child) = child {
        log::debug!("segment '{}' matched '{}' partially", segment, child.label);
    }
    child
}

/// Normalize a label for fuzzy comparison: strip `: , ( )`, fold dash and
/// slash variants to `-`, collapse space runs, lowercase.
///
/// Slash and underscore both fold to `-` because folder names had
/// filesystem-invalid `/` rewritten to `_` while category metadata still
/// carries the original character.
fn normalize_label(label: &str) -> String {
    let folded: String = label
        .chars()
        .filter_map(|c| match c {
            ':' | ',' | '(' | ')' => None,
            '\u{2013}' | '\u{2212}' | '/' | '_' => Some('-'),
            c => Some(c),
        })
        .collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
