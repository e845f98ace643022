//! engine::query
//!
//! Turning user text into a type key.
//!
//! # Pipeline
//!
//! 1. All digits: numeric shortcut from the binding store
//! 2. Normalized text bound as an alias: the bound key
//! 3. Otherwise: fuzzy [`resolve`] against the candidate keys
//!
//! Shortcuts and aliases win even when the bound type is not in the ship,
//! so a binding can name a type that has not been picked up yet.

use std::fmt;

use thiserror::Error;

use crate::core::types::TypeKey;
use crate::store::traits::{alias_name, shortcut_id};
use crate::store::{BindingStore, StoreError};

use super::scan::{resolve, ResolveError};

/// Errors from query resolution.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Whether the query matched nothing (as opposed to several things).
    pub fn is_no_match(&self) -> bool {
        matches!(
            self,
            QueryError::Resolve(ResolveError::NoMatch(_) | ResolveError::UnboundShortcut(_))
        )
    }
}

/// The left-hand side of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingName {
    Shortcut(u32),
    Alias(String),
}

impl BindingName {
    /// Digits name a shortcut; anything else is an alias.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidShortcut` for id 0, `StoreError::InvalidAlias`
    /// for text that normalizes to nothing.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let trimmed = raw.trim();
        match parse_shortcut(trimmed) {
            Some(id) => Ok(BindingName::Shortcut(shortcut_id(id)?)),
            None => Ok(BindingName::Alias(alias_name(trimmed)?)),
        }
    }
}

impl fmt::Display for BindingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingName::Shortcut(id) => write!(f, "{}", id),
            BindingName::Alias(name) => write!(f, "{}", name),
        }
    }
}

fn parse_shortcut(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Resolve `query` through bindings, then fuzzily against `candidates`.
pub fn resolve_query(
    query: &str,
    bindings: &dyn BindingStore,
    candidates: &[TypeKey],
) -> Result<TypeKey, QueryError> {
    let trimmed = query.trim();

    if let Some(id) = parse_shortcut(trimmed) {
        return bindings
            .shortcut(id)?
            .ok_or(QueryError::Resolve(ResolveError::UnboundShortcut(id)));
    }

    if let Ok(name) = alias_name(trimmed) {
        if let Some(key) = bindings.alias(&name)? {
            tracing::debug!(alias = %name, %key, "query matched alias");
            return Ok(key);
        }
    }

    Ok(resolve(trimmed, candidates)?)
}

/// Bind `name` to `key`.
pub fn bind(bindings: &dyn BindingStore, name: &BindingName, key: &TypeKey) -> Result<(), StoreError> {
    match name {
        BindingName::Shortcut(id) => bindings.set_shortcut(*id, key),
        BindingName::Alias(alias) => bindings.set_alias(alias, key),
    }
}

/// Remove the binding for `name`. Returns whether it existed.
pub fn unbind(bindings: &dyn BindingStore, name: &BindingName) -> Result<bool, StoreError> {
    match name {
        BindingName::Shortcut(id) => bindings.remove_shortcut(*id),
        BindingName::Alias(alias) => bindings.remove_alias(alias),
    }
}
