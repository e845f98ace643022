//! engine::scan
//!
//! Candidate scanning and query resolution.
//!
//! # Architecture
//!
//! [`scan`] takes the items the world reports, keeps the eligible ones for
//! a [`SkipPolicy`], and groups them by [`TypeKey`]. The result is rebuilt
//! at the start of every operation and never cached.
//!
//! # Ordering
//!
//! - Items: ascending scrap value, then type key, then id
//! - Groups: two-handed types first, then lexicographic by key
//!
//! Both orders depend only on item state, so grid paging is stable across
//! runs.
//!
//! # Example
//!
//! ```
//! use shipsort::core::types::{ItemId, ItemState, TypeKey};
//! use shipsort::engine::scan::{resolve, scan, SkipPolicy, SkipRules};
//!
//! let items = vec![
//!     ItemState { id: ItemId(1), name: "Key".into(), ..ItemState::default() },
//!     ItemState { id: ItemId(2), name: "Shovel".into(), ..ItemState::default() },
//! ];
//! let rules = SkipRules::substring(["key"]);
//!
//! let groups = scan(items.clone(), SkipPolicy::Default, &rules);
//! assert_eq!(groups.keys(), vec![TypeKey::new("shovel").unwrap()]);
//!
//! let all = scan(items, SkipPolicy::ExplicitQuery, &rules);
//! assert_eq!(all.len(), 2);
//! assert_eq!(resolve("shov", &all.keys()).unwrap().as_str(), "shovel");
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::config::SkipMatch;
use crate::core::naming;
use crate::core::types::{ItemState, TypeKey};

/// Most candidates an ambiguity error lists.
pub const MAX_AMBIGUOUS_CANDIDATES: usize = 8;

/// Which configured skip tokens apply to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Baseline eligibility plus the skip tokens.
    Default,
    /// Baseline only; the player named a type explicitly.
    ExplicitQuery,
    /// Baseline only; `--all` and override flows.
    IgnoreSkipTokens,
}

impl SkipPolicy {
    fn applies_tokens(self) -> bool {
        self == SkipPolicy::Default
    }
}

/// Configured skip tokens and how they match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipRules {
    tokens: Vec<String>,
    mode: SkipMatch,
}

impl SkipRules {
    /// Build rules from already-normalized tokens. Empty tokens are dropped.
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>, mode: SkipMatch) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
            mode,
        }
    }

    pub fn substring(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(tokens, SkipMatch::Substring)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether any token matches `key`.
    pub fn matches(&self, key: &TypeKey) -> bool {
        let key = key.as_str();
        self.tokens.iter().any(|token| match self.mode {
            SkipMatch::Substring => key.contains(token.as_str()),
            SkipMatch::Exact => key == token,
        })
    }
}

/// Eligible items of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: TypeKey,
    /// Any member needs both hands.
    pub two_handed: bool,
    /// Members in placement order.
    pub items: Vec<ItemState>,
}

/// Ordered groups produced by one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    groups: Vec<Group>,
}

impl CandidateSet {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    /// Group for `key`, if any member is eligible.
    pub fn get(&self, key: &TypeKey) -> Option<&Group> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Keys in group order.
    pub fn keys(&self) -> Vec<TypeKey> {
        self.groups.iter().map(|g| g.key.clone()).collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Keep only groups for which `keep` holds, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&Group) -> bool) {
        self.groups.retain(keep);
    }
}

/// Whether `item` passes baseline eligibility and, under `policy`, the skip rules.
pub fn is_candidate(item: &ItemState, policy: SkipPolicy, rules: &SkipRules) -> bool {
    if !item.is_eligible() {
        return false;
    }
    !(policy.applies_tokens() && rules.matches(&item.key()))
}

/// Group eligible items by type key.
pub fn scan(
    items: impl IntoIterator<Item = ItemState>,
    policy: SkipPolicy,
    rules: &SkipRules,
) -> CandidateSet {
    let mut keyed: Vec<(TypeKey, ItemState)> = items
        .into_iter()
        .filter(|item| is_candidate(item, policy, rules))
        .map(|item| (item.key(), item))
        .collect();

    keyed.sort_by(|(ka, a), (kb, b)| {
        a.scrap_value
            .cmp(&b.scrap_value)
            .then_with(|| ka.cmp(kb))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut by_key: BTreeMap<TypeKey, Group> = BTreeMap::new();
    for (key, item) in keyed {
        let group = by_key.entry(key.clone()).or_insert_with(|| Group {
            key,
            two_handed: false,
            items: Vec::new(),
        });
        group.two_handed |= item.two_handed;
        group.items.push(item);
    }

    let mut groups: Vec<Group> = by_key.into_values().collect();
    // stable: BTreeMap already yields keys in order
    groups.sort_by_key(|g| !g.two_handed);

    CandidateSet { groups }
}

/// Errors from query resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no item matches '{0}'")]
    NoMatch(String),

    #[error("no item bound to shortcut {0}")]
    UnboundShortcut(u32),

    #[error("'{}' is ambiguous: {}{}", .query, .candidates.join(", "), more_suffix(.total, .candidates.len()))]
    Ambiguous {
        query: String,
        /// At most [`MAX_AMBIGUOUS_CANDIDATES`], sorted.
        candidates: Vec<String>,
        /// Number of matches before truncation.
        total: usize,
    },
}

fn more_suffix(total: &usize, shown: usize) -> String {
    let total = *total;
    if total > shown {
        format!(" (+{} more)", total - shown)
    } else {
        String::new()
    }
}

/// Resolve a free-text query against candidate keys.
///
/// An exact key wins. Otherwise a key matches when it contains the query
/// or the query contains it, comparing both with and without underscores.
/// Exactly one match resolves.
///
/// # Errors
///
/// - `ResolveError::NoMatch` for blank queries or no matches
/// - `ResolveError::Ambiguous` when several keys match
pub fn resolve(query: &str, candidates: &[TypeKey]) -> Result<TypeKey, ResolveError> {
    let q = naming::normalize(query);
    if q.is_empty() {
        return Err(ResolveError::NoMatch(query.trim().to_string()));
    }

    if let Some(exact) = candidates.iter().find(|k| k.as_str() == q) {
        return Ok(exact.clone());
    }

    let q_compact = naming::compact(&q);
    let mut matches: Vec<&TypeKey> = candidates
        .iter()
        .filter(|key| {
            let k = key.as_str();
            let k_compact = naming::compact(k);
            k.contains(q.as_str())
                || q.contains(k)
                || (!q_compact.is_empty() && k_compact.contains(q_compact.as_str()))
                || (!k_compact.is_empty() && q_compact.contains(k_compact.as_str()))
        })
        .collect();
    matches.sort();
    matches.dedup();

    match matches.as_slice() {
        [] => Err(ResolveError::NoMatch(q)),
        [only] => Ok((*only).clone()),
        many => Err(ResolveError::Ambiguous {
            query: q,
            total: many.len(),
            candidates: many
                .iter()
                .take(MAX_AMBIGUOUS_CANDIDATES)
                .map(|k| k.to_string())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ItemId;

    fn item(id: u64, name: &str, value: i32) -> ItemState {
        ItemState {
            id: ItemId(id),
            name: name.to_string(),
            scrap_value: value,
            ..ItemState::default()
        }
    }

    fn keys(names: &[&str]) -> Vec<TypeKey> {
        names.iter().map(|n| TypeKey::new(n).unwrap()).collect()
    }

    #[test]
    fn skip_tokens_apply_only_to_default() {
        let items = vec![
            item(1, "key", 3),
            item(2, "key", 3),
            item(3, "key", 3),
            item(4, "shovel", 10),
            item(5, "shovel", 12),
        ];
        let rules = SkipRules::substring(["body", "key"]);

        let default = scan(items.clone(), SkipPolicy::Default, &rules);
        assert_eq!(default.keys(), keys(&["shovel"]));
        assert_eq!(default.item_count(), 2);

        let explicit = scan(items, SkipPolicy::ExplicitQuery, &rules);
        assert_eq!(explicit.get(&TypeKey::new("key").unwrap()).unwrap().items.len(), 3);
    }

    #[test]
    fn substring_versus_exact_matching() {
        let monkey = TypeKey::new("monkey").unwrap();
        assert!(SkipRules::substring(["key"]).matches(&monkey));
        assert!(!SkipRules::new(["key"], SkipMatch::Exact).matches(&monkey));
    }

    #[test]
    fn empty_tokens_never_match() {
        let rules = SkipRules::substring(["", "body"]);
        assert_eq!(rules.tokens(), &["body".to_string()]);
        assert!(!rules.matches(&TypeKey::new("shovel").unwrap()));
    }

    #[test]
    fn ineligible_items_are_dropped_under_every_policy() {
        let mut held = item(1, "shovel", 0);
        held.held = true;
        let body = item(2, "Body", 0);
        for policy in [
            SkipPolicy::Default,
            SkipPolicy::ExplicitQuery,
            SkipPolicy::IgnoreSkipTokens,
        ] {
            assert!(scan(vec![held.clone(), body.clone()], policy, &SkipRules::default()).is_empty());
        }
    }

    #[test]
    fn ordering_is_deterministic() {
        let mut ladder = item(9, "Extension ladder", 0);
        ladder.two_handed = true;
        let items = vec![
            item(4, "shovel", 20),
            item(3, "airhorn", 5),
            item(2, "shovel", 5),
            ladder,
            item(1, "shovel", 5),
        ];
        let set = scan(items, SkipPolicy::Default, &SkipRules::default());

        assert_eq!(set.keys(), keys(&["extension_ladder", "airhorn", "shovel"]));
        let shovel_ids: Vec<u64> = set.groups()[2].items.iter().map(|i| i.id.0).collect();
        assert_eq!(shovel_ids, vec![1, 2, 4]);
    }

    #[test]
    fn localized_names_group_together() {
        let items = vec![item(1, "Key", 3), item(2, "열쇠", 3)];
        let set = scan(items, SkipPolicy::ExplicitQuery, &SkipRules::default());
        assert_eq!(set.len(), 1);
        assert_eq!(set.item_count(), 2);
    }

    #[test]
    fn resolve_ambiguous_lists_both() {
        let err = resolve("red", &keys(&["red_key", "redstone"])).unwrap_err();
        match err {
            ResolveError::Ambiguous { candidates, total, .. } => {
                assert_eq!(candidates, vec!["red_key", "redstone"]);
                assert_eq!(total, 2);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn resolve_single_prefix() {
        let key = resolve("shov", &keys(&["shovel", "key"])).unwrap();
        assert_eq!(key.as_str(), "shovel");
    }

    #[test]
    fn resolve_exact_beats_containment() {
        let key = resolve("key", &keys(&["key", "red_key"])).unwrap();
        assert_eq!(key.as_str(), "key");
    }

    #[test]
    fn resolve_ignores_underscores() {
        let key = resolve("stopsign", &keys(&["stop_sign", "shovel"])).unwrap();
        assert_eq!(key.as_str(), "stop_sign");
        let key = resolve("big bolt please", &keys(&["big_bolt", "airhorn"])).unwrap();
        assert_eq!(key.as_str(), "big_bolt");
    }

    #[test]
    fn resolve_blank_and_missing() {
        assert!(matches!(resolve("  ", &keys(&["shovel"])), Err(ResolveError::NoMatch(_))));
        assert!(matches!(resolve("zzz", &keys(&["shovel"])), Err(ResolveError::NoMatch(_))));
    }

    #[test]
    fn ambiguity_is_truncated() {
        let names: Vec<String> = (0..10).map(|i| format!("bolt_{i}")).collect();
        let candidates: Vec<TypeKey> = names.iter().map(|n| TypeKey::new(n).unwrap()).collect();
        let err = resolve("bolt", &candidates).unwrap_err();
        match &err {
            ResolveError::Ambiguous { candidates, total, .. } => {
                assert_eq!(candidates.len(), MAX_AMBIGUOUS_CANDIDATES);
                assert_eq!(*total, 10);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        assert!(err.to_string().contains("(+2 more)"));
    }
}
