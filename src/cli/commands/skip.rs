//! skip command - Show or edit the skip list

use super::CommandError;
use crate::cli::args::{join_words, SkipAction};
use crate::engine::Engine;

pub fn skip(engine: &Engine, action: SkipAction) -> Result<String, CommandError> {
    match action {
        SkipAction::List => {
            let tokens = engine.list_skip_tokens();
            Ok(if tokens.is_empty() {
                "Skip list is empty".to_string()
            } else {
                format!("Skip list: {}", tokens.join(", "))
            })
        }
        SkipAction::Add { token } => {
            let raw = join_words(&token).unwrap_or_default();
            Ok(if engine.add_skip_token(&raw)? {
                format!("Added '{}' to the skip list", raw)
            } else {
                format!("'{}' is already skipped", raw)
            })
        }
        SkipAction::Remove { token } => {
            let raw = join_words(&token).unwrap_or_default();
            Ok(if engine.remove_skip_token(&raw)? {
                format!("Removed '{}' from the skip list", raw)
            } else {
                format!("'{}' was not in the skip list", raw)
            })
        }
    }
}
