//! bind / unbind / bindings commands - Shortcuts and aliases

use super::CommandError;
use crate::engine::Engine;

pub fn bind(engine: &Engine, name: &str, item: &str) -> Result<String, CommandError> {
    let (name, key) = engine.bind(name, item)?;
    Ok(format!("Bound {} to {}", name, key))
}

pub fn unbind(engine: &Engine, name: &str) -> Result<String, CommandError> {
    let (name, removed) = engine.unbind(name)?;
    Ok(if removed {
        format!("Unbound {}", name)
    } else {
        format!("{} was not bound", name)
    })
}

/// Shortcuts first, then aliases.
pub fn bindings(engine: &Engine) -> Result<String, CommandError> {
    let list = engine.list_bindings()?;
    let lines: Vec<String> = list
        .shortcuts
        .iter()
        .map(|(id, key)| format!("{} -> {}", id, key))
        .chain(list.aliases.iter().map(|(name, key)| format!("{} -> {}", name, key)))
        .collect();
    if lines.is_empty() {
        return Ok("No bindings".to_string());
    }
    Ok(lines.join("\n"))
}
