//! `counter`: dispatches a few actions through two slices and prints the state.
//!
//! Extra actions can be passed as JSON on the command line:
//!
//! ```text
//! counter '{"type": "counter_add", "payload": [5]}' '{"type": "app/RESET"}'
//! ```
//!
//! Set `RUST_LOG=atomic_slice=trace` to watch routing decisions.

mod app;

use anyhow::{Context, Result};
use atomic_slice::Catalog;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::Store;

#[derive(Debug, Parser)]
#[command(name = "counter", about = "Slices sharing one dispatch channel")]
struct Cli {
    /// Skip the built-in demo actions.
    #[arg(long)]
    no_demo: bool,

    /// List every action type the store reacts to and exit.
    #[arg(long)]
    list: bool,

    /// Extra actions to dispatch, as JSON objects.
    actions: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = Catalog::new();
    let (mut store, actions) = Store::new(&catalog).context("failed to set up slices")?;

    if cli.list {
        for action_type in store.action_types() {
            println!("{action_type}");
        }
        return Ok(());
    }

    if !cli.no_demo {
        store.dispatch(&actions.increment.create(()));
        store.dispatch(&actions.add.create((41,)));
        store.dispatch(&actions.push.create(("learn slices".into(),)));
        store.dispatch(&actions.push.create(("ship it".into(),)));
        store.dispatch(&actions.complete.create((None,)));
    }

    for raw in &cli.actions {
        let value: serde_json::Value =
            serde_json::from_str(raw).with_context(|| format!("invalid action JSON: {raw}"))?;
        store.dispatch_value(&value);
    }

    println!("{}", serde_json::to_string_pretty(store.state())?);
    Ok(())
}
