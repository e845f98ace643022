//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Turns parsed arguments into engine options
//! 2. Calls the [`Engine`]
//! 3. Formats the result as one chat reply
//!
//! Handlers never touch the world or the stores directly.

mod bindings;
mod positions;
mod skip;
mod sort;

pub use bindings::{bind, bindings, unbind};
pub use positions::{positions, reset, set};
pub use skip::skip;
pub use sort::{cancel, sort};

use thiserror::Error;

use crate::cli::args::{join_words, Action, ChatCommand};
use crate::engine::{Engine, EngineError};

/// Errors surfaced to the player as a chat line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CommandError {
    /// Header for the warning popup.
    pub fn header(&self) -> &'static str {
        match self {
            CommandError::Usage(_) => "Sorter Usage",
            CommandError::Engine(_) => "Sorter Error",
        }
    }
}

/// Dispatch a parsed command to its handler.
pub async fn dispatch(engine: &Engine, command: ChatCommand) -> Result<String, CommandError> {
    match command.action {
        None => sort::sort(engine, &command.sort).await,
        Some(Action::Set { item }) => positions::set(engine, join_words(&item).as_deref()),
        Some(Action::Reset { item }) => positions::reset(engine, &join_words(&item).unwrap_or_default()),
        Some(Action::Positions) => positions::positions(engine),
        Some(Action::Bind { name, item }) => {
            bindings::bind(engine, &name, &join_words(&item).unwrap_or_default())
        }
        Some(Action::Unbind { name }) => bindings::unbind(engine, &name),
        Some(Action::Bindings) => bindings::bindings(engine),
        Some(Action::Skip { action }) => skip::skip(engine, action),
        Some(Action::Cancel) => Ok(sort::cancel(engine)),
    }
}

/// Parse and run one chat line.
///
/// Help requests come back as `Ok` with the help text.
pub async fn run_line(engine: &Engine, line: &str) -> Result<String, CommandError> {
    use clap::error::ErrorKind;

    let command = match ChatCommand::parse_line(line) {
        Ok(command) => command,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand) => {
            return Ok(e.to_string().trim_end().to_string())
        }
        Err(e) => return Err(CommandError::Usage(e.to_string().trim_end().to_string())),
    };
    tracing::debug!(?command, "chat command");
    dispatch(engine, command).await
}
