//! cli::args
//!
//! Chat command definitions using clap derive.
//!
//! # Grammar
//!
//! ```text
//! sort [-r|--redo] [-a|--all] [-o|--overrides] [ITEM...]
//! sort set [ITEM...]
//! sort reset <ITEM...>
//! sort positions
//! sort bind <ID|ALIAS> <ITEM...>
//! sort unbind <ID|ALIAS>
//! sort bindings
//! sort skip list|add|remove [TOKEN...]
//! sort cancel
//! ```
//!
//! Without an item, `sort` sorts the whole ship. With one, it moves that
//! type to the player. The legacy single-dash spellings `-redo` and `-all`
//! are accepted.
//!
//! [`Sandbox`] holds the flags of the `shipsort` binary itself.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// shipsort - Run sort commands against a scene file
#[derive(Parser, Debug)]
#[command(name = "shipsort")]
#[command(author, version, about, long_about = None)]
pub struct Sandbox {
    /// Scene JSON: ship transform, floor, platforms, actor and items
    #[arg(long, value_name = "FILE")]
    pub scene: PathBuf,

    /// Config file (default: searched in the usual locations)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep positions and bindings in memory instead of on disk
    #[arg(long)]
    pub memory: bool,

    /// Print the final item states as JSON
    #[arg(long)]
    pub dump: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Chat lines to run in order, e.g. "/sort -r" (default: read stdin)
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl Sandbox {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Sort the items on the ship.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "sort", no_binary_name = true, disable_version_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct ChatCommand {
    #[command(flatten)]
    pub sort: SortArgs,

    #[command(subcommand)]
    pub action: Option<Action>,
}

/// Flags for sorting and moving.
#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct SortArgs {
    /// Move items even if they are already in place
    #[arg(short = 'r', long = "redo")]
    pub redo: bool,

    /// Also sort skip-listed item types
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Also sort skip-listed types that have a saved position
    #[arg(short = 'o', long = "overrides")]
    pub overrides: bool,

    /// Move only this item type to you
    #[arg(value_name = "ITEM")]
    pub item: Vec<String>,
}

impl SortArgs {
    /// The item words joined back into one query, if any.
    pub fn item_query(&self) -> Option<String> {
        join_words(&self.item)
    }
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Action {
    /// Save your position as the pile for an item type (default: held item)
    Set {
        #[arg(value_name = "ITEM")]
        item: Vec<String>,
    },

    /// Forget the saved pile position for an item type
    Reset {
        #[arg(value_name = "ITEM", required = true)]
        item: Vec<String>,
    },

    /// List saved pile positions
    Positions,

    /// Bind a shortcut number or alias to an item type
    Bind {
        /// Shortcut number (1 or more) or alias text
        name: String,

        #[arg(value_name = "ITEM", required = true)]
        item: Vec<String>,
    },

    /// Remove a shortcut or alias
    Unbind { name: String },

    /// List shortcuts and aliases
    Bindings,

    /// Show or edit the skip list
    Skip {
        #[command(subcommand)]
        action: SkipAction,
    },

    /// Stop the running sort before its next item
    Cancel,
}

/// Skip list edits.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SkipAction {
    List,
    Add {
        #[arg(value_name = "TOKEN", required = true)]
        token: Vec<String>,
    },
    Remove {
        #[arg(value_name = "TOKEN", required = true)]
        token: Vec<String>,
    },
}

/// Join positional words with single spaces; `None` when there are none.
pub fn join_words(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split a chat line into clap arguments.
///
/// Drops the leading `/sort` (or `sort`) and rewrites legacy flags.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = line.split_whitespace().peekable();
    if let Some(first) = words.peek() {
        if first.trim_start_matches('/').eq_ignore_ascii_case("sort") {
            words.next();
        }
    }
    words
        .map(|word| match word {
            "-redo" => "--redo".to_string(),
            "-all" => "--all".to_string(),
            other => other.to_string(),
        })
        .collect()
}

impl ChatCommand {
    /// Parse one chat line.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(tokenize(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_sort_is_full_sort() {
        let cmd = ChatCommand::parse_line("/sort").unwrap();
        assert_eq!(cmd.action, None);
        assert_eq!(cmd.sort, SortArgs::default());
    }

    #[test]
    fn legacy_flags_are_accepted() {
        let cmd = ChatCommand::parse_line("/sort -redo -all").unwrap();
        assert!(cmd.sort.redo);
        assert!(cmd.sort.all);

        let cmd = ChatCommand::parse_line("sort -r -a").unwrap();
        assert!(cmd.sort.redo && cmd.sort.all);
    }

    #[test]
    fn item_words_join() {
        let cmd = ChatCommand::parse_line("/sort big bolt").unwrap();
        assert_eq!(cmd.sort.item_query().as_deref(), Some("big bolt"));
    }

    #[test]
    fn subcommands_parse() {
        let cmd = ChatCommand::parse_line("/sort bind 2 stun grenade").unwrap();
        assert_eq!(
            cmd.action,
            Some(Action::Bind {
                name: "2".into(),
                item: vec!["stun".into(), "grenade".into()],
            })
        );

        let cmd = ChatCommand::parse_line("/sort skip add red key").unwrap();
        assert!(matches!(cmd.action, Some(Action::Skip { action: SkipAction::Add { .. } })));

        assert_eq!(
            ChatCommand::parse_line("/sort cancel").unwrap().action,
            Some(Action::Cancel)
        );
    }

    #[test]
    fn reset_needs_an_item() {
        assert!(ChatCommand::parse_line("/sort reset").is_err());
    }

    #[test]
    fn help_is_a_display_error() {
        let err = ChatCommand::parse_line("/sort --help").unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
