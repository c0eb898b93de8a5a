use std::collections::HashSet;

use super::Keyed;

/// Collapse rules sharing a key so only the last definition of each survives.
///
/// Walks the input in reverse, keeping the first occurrence of each key (its
/// last occurrence in the original order), then restores the original
/// relative order of the survivors.
pub fn normalize<'a, T: Keyed>(rules: &[&'a T]) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for &rule in rules.iter().rev() {
        if seen.insert(rule.key()) {
            kept.push(rule);
        }
    }
    kept.reverse();
    kept
}
