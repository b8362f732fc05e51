//! Tresor - Claude Code configuration installer
//!
//! Installs agents, skills, commands and settings from a repository checkout
//! into `~/.claude`, updates them from the upstream repository, and backs
//! local edits up into the checkout.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod commands;
mod common;
mod domain;
mod error;
mod git;
mod hash;
mod layout;
mod lock;
mod manifest;
mod operations;
mod report;
mod snapshot;
mod ui;

use cli::{Cli, Commands};
use error::Result;
use layout::Layout;
use ui::log;

fn run(cli: Cli) -> Result<()> {
    log::set_verbose(cli.verbose);

    let layout = || -> Result<Layout> {
        let layout = Layout::resolve(cli.claude_dir.clone(), cli.source.clone())?;
        log::debug(format!("Installation root: {}", layout.root.display()));
        log::debug(format!("Checkout: {}", layout.source.display()));
        Ok(layout)
    };

    match cli.command {
        Commands::Install(args) => commands::install::run(&layout()?, args),
        Commands::Update(args) => commands::update::run(&layout()?, args),
        Commands::Backup => commands::backup::run(&layout()?),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error(&e);
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
