//! sort command - Sort the whole ship, or move one type to the player

use super::CommandError;
use crate::cli::args::SortArgs;
use crate::engine::{Engine, FullSortOptions, MoveOptions, Outcome, SortReport};

/// Run a full sort, or a targeted move when an item is named.
pub async fn sort(engine: &Engine, args: &SortArgs) -> Result<String, CommandError> {
    let report = match args.item_query() {
        None => {
            engine
                .run_full_sort(FullSortOptions {
                    force: args.redo,
                    ignore_skip: args.all,
                    include_reserved_overrides: args.overrides,
                })
                .await?
        }
        Some(query) => {
            engine
                .run_targeted_move(
                    &query,
                    MoveOptions {
                        force: args.redo,
                        drop_held_first: true,
                    },
                )
                .await?
        }
    };
    Ok(format_report(&report))
}

fn format_report(report: &SortReport) -> String {
    match report.outcome {
        Outcome::Completed => format!("Sorted: {}", report.summary()),
        Outcome::Cancelled(reason) => format!("Stopped ({}): {}", reason, report.summary()),
    }
}

/// Request cancellation of the running operation.
pub fn cancel(engine: &Engine) -> String {
    if engine.request_cancel() {
        "Cancelling after the current item".to_string()
    } else {
        "Nothing to cancel".to_string()
    }
}
