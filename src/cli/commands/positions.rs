//! set / reset / positions commands - Saved pile positions

use super::CommandError;
use crate::engine::Engine;

/// Save the player's position for an item type (the held item if none given).
pub fn set(engine: &Engine, item: Option<&str>) -> Result<String, CommandError> {
    let (key, p) = engine.set_override_position(item.unwrap_or(""))?;
    Ok(format!("Saved {} at ({:.2}, {:.2}, {:.2})", key, p.x, p.y, p.z))
}

/// Forget the saved position for an item type.
pub fn reset(engine: &Engine, item: &str) -> Result<String, CommandError> {
    let (key, removed) = engine.remove_override_position(item)?;
    Ok(if removed {
        format!("Reset {}", key)
    } else {
        format!("No saved position for {}", key)
    })
}

/// List saved positions, one per line.
pub fn positions(engine: &Engine) -> Result<String, CommandError> {
    let saved = engine.list_positions()?;
    if saved.is_empty() {
        return Ok("No saved positions".to_string());
    }
    Ok(saved
        .iter()
        .map(|(key, p)| format!("{}: ({:.2}, {:.2}, {:.2})", key, p.x, p.y, p.z))
        .collect::<Vec<_>>()
        .join("\n"))
}
