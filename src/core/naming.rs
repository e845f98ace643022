//! core::naming
//!
//! Item name canonicalization.
//!
//! # Rules
//!
//! - Trim surrounding whitespace
//! - Lowercase
//! - Spaces and hyphens become underscores
//! - Known alternate labels (localized or legacy) fold to one canonical key
//!
//! The alias lookup is built once from [`crate::core::aliases`] and never
//! mutated afterwards, so [`normalize`] is a pure function.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::aliases::{GROUPS, PAIRS};

static ALIASES: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Canonicalize a display name into a type key.
///
/// # Example
///
/// ```
/// use shipsort::core::naming::normalize;
///
/// assert_eq!(normalize("  Stop Sign "), "stop_sign");
/// assert_eq!(normalize("Walkie-Talkie"), "walkie_talkie");
/// assert_eq!(normalize("Mug"), "coffee_mug");
/// assert_eq!(normalize("열쇠"), "key");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let key = normalize_no_alias(raw);
    if key.is_empty() {
        return key;
    }
    match aliases().get(&key) {
        Some(canonical) => canonical.clone(),
        None => key,
    }
}

/// Canonicalize without consulting the alias table.
pub fn normalize_no_alias(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Drop underscores, for loose comparison of user queries.
pub fn compact(key: &str) -> String {
    key.chars().filter(|&c| c != '_').collect()
}

/// Number of alternate labels in the lookup.
pub fn alias_count() -> usize {
    aliases().len()
}

fn aliases() -> &'static HashMap<String, String> {
    ALIASES.get_or_init(build_aliases)
}

fn build_aliases() -> HashMap<String, String> {
    let mut table = HashMap::new();

    let mut add = |alternate: &str, canonical: &str| {
        let from = normalize_no_alias(alternate);
        let to = normalize_no_alias(canonical);
        if from.is_empty() || to.is_empty() {
            return;
        }
        // first mapping wins
        table.entry(from).or_insert(to);
    };

    for (canonical, alternates) in GROUPS {
        add(canonical, canonical);
        for alternate in alternates.iter() {
            add(alternate, canonical);
        }
    }
    for (alternate, canonical) in PAIRS {
        add(alternate, canonical);
    }

    collapse_chains(&mut table);
    table
}

/// Point every alternate straight at its final key, so a canonical name
/// that is itself an alternate cannot make `normalize` non-idempotent.
fn collapse_chains(table: &mut HashMap<String, String>) {
    let limit = table.len();
    let keys: Vec<String> = table.keys().cloned().collect();
    for key in keys {
        let Some(mut target) = table.get(&key).cloned() else {
            continue;
        };
        for _ in 0..limit {
            match table.get(&target) {
                Some(next) if *next != target => target = next.clone(),
                _ => break,
            }
        }
        table.insert(key, target);
    }
}
