//! mirage terminal on stdin/stdout.
//!
//! Each stdin line is typed into whichever surface is focal and submitted.
//! A line reading `^C` cancels the running command. Configuration and notes
//! persist as JSON files under `MIRAGE_DATA_DIR` (default `.mirage`);
//! `MIRAGE_DEFAULTS` may point at a TOML file overriding the default
//! configuration.

mod input;
mod presenter;

use std::io::{self, BufRead};

use anyhow::{Context, Result};

use mirage_storage::FileStorage;
use mirage_terminal::{Terminal, commands};
use mirage_types::config::Config;

use presenter::TextPresenter;

const DEFAULT_DATA_DIR: &str = ".mirage";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = std::env::var("MIRAGE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("opening data directory {data_dir}"))?;
    log::info!("Starting mirage (data in {data_dir})");

    let defaults = load_defaults()?;
    let mut terminal = Terminal::with_defaults(
        Box::new(storage),
        Box::new(TextPresenter::new(io::stdout())),
        defaults,
    );
    terminal.install(commands::builtins())?;

    if terminal.is_first_launch() {
        terminal.run_line("welcome", true)?;
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let prompt_text = terminal.prompt_text();
        let events = input::line_events(terminal.input_mode(), prompt_text.as_deref(), &line);
        terminal.handle_events(events);
    }

    println!();
    log::info!("mirage shut down cleanly");
    Ok(())
}

/// Defaults from `MIRAGE_DEFAULTS`, or the built-in ones.
fn load_defaults() -> Result<Config> {
    let Ok(path) = std::env::var("MIRAGE_DEFAULTS") else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = Config::from_toml(&text).with_context(|| format!("parsing {path}"))?;
    log::info!("Loaded default overrides from {path}");
    Ok(config)
}
