//! cli
//!
//! Chat command layer for the sorter.
//!
//! # Responsibilities
//!
//! - Parse `/sort ...` chat lines
//! - Delegate to command handlers
//! - Does NOT move items or edit stores directly
//!
//! # Architecture
//!
//! The layer is thin. It parses a line via clap and dispatches to the
//! [`crate::engine::Engine`], which owns every state change. Replies are
//! plain strings; errors carry a popup header.

pub mod args;
pub mod commands;

pub use args::{Action, ChatCommand, SkipAction, SortArgs};
pub use commands::{dispatch, run_line, CommandError};

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::engine::Engine;
use crate::store::{
    BindingStore, JsonBindingStore, JsonPositionStore, MemoryBindingStore, MemoryPositionStore,
    PositionStore,
};
use crate::ui::output::{self, Verbosity};
use crate::world::{MockWorld, Scene};

pub use args::Sandbox;

/// Run the sandbox binary.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Sandbox::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    init_logging(verbosity);

    let text = std::fs::read_to_string(&cli.scene)
        .with_context(|| format!("Failed to read scene '{}'", cli.scene.display()))?;
    let scene = Scene::from_json(&text)
        .with_context(|| format!("Failed to parse scene '{}'", cli.scene.display()))?;
    let world = MockWorld::with_scene(scene);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    let (positions, bindings): (Arc<dyn PositionStore>, Arc<dyn BindingStore>) = if cli.memory {
        (
            Arc::new(MemoryPositionStore::new()),
            Arc::new(MemoryBindingStore::new()),
        )
    } else {
        (
            Arc::new(JsonPositionStore::new(config.positions_path()?)),
            Arc::new(JsonBindingStore::new(config.bindings_path()?)),
        )
    };

    let engine = Engine::new(Arc::new(world.clone()), positions, bindings, config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let lines: Vec<String> = if cli.commands.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<Result<_, _>>()
            .context("Failed to read commands from stdin")?
    } else {
        cli.commands.clone()
    };

    let mut failed = 0;
    let mut shown = 0;
    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        output::debug(format_args!("> {}", line), verbosity);
        match runtime.block_on(run_line(&engine, line)) {
            Ok(reply) => output::print(reply, verbosity),
            Err(e) => {
                failed += 1;
                output::error(format_args!("{}: {}", e.header(), e));
            }
        }
        let notices = world.notices();
        output::notices(&notices[shown..], verbosity);
        shown = notices.len();
    }

    if cli.dump {
        let items = world.scene().items;
        println!("{}", serde_json::to_string_pretty(&items)?);
    }

    if failed > 0 {
        bail!("{} command(s) failed", failed);
    }
    Ok(())
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env("SHIPSORT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
