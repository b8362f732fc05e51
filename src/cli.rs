//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::UpdateScope;

/// Tresor - Claude Code configuration installer
///
/// Installs agents, skills and commands from a tresor checkout into ~/.claude,
/// keeps them up to date, and backs local edits up into the checkout.
#[derive(Parser, Debug)]
#[command(
    name = "tresor",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install, update and back up a Claude Code configuration",
    long_about = "Tresor copies agents, skills, commands and settings from a repository \
                  checkout into the Claude Code configuration directory (~/.claude), pulls \
                  upstream changes through its own clone, and mirrors local edits back.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  tresor install\n    \
                  tresor update --check\n    \
                  tresor update --commands-only\n    \
                  tresor update --rollback\n    \
                  tresor backup"
)]
pub struct Cli {
    /// Installation root (defaults to ~/.claude)
    #[arg(long, global = true, env = "TRESOR_CLAUDE_DIR", value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Repository checkout to install from or back up into (defaults to current directory)
    #[arg(long, global = true, env = "TRESOR_SOURCE", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the checkout into the installation root
    Install(InstallArgs),

    /// Pull upstream changes and refresh installed components
    Update(UpdateArgs),

    /// Copy the installation root back into the checkout
    Backup,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install from the current checkout:\n    tresor install\n\n\
                   Install from another checkout:\n    tresor install --source ~/src/claude-code-tresor\n\n\
                   Reinstall without backup or prompts:\n    tresor install --force")]
pub struct InstallArgs {
    /// Skip the backup and overwrite settings.json without asking
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for the update command
#[derive(Parser, Debug)]
#[command(
    group(ArgGroup::new("scope").args(["commands_only", "agents_only", "resources_only"])),
    group(ArgGroup::new("maintenance").args(["rollback", "cleanup"])),
    after_help = "EXAMPLES:\n  \
                  Check for updates:\n    tresor update --check\n\n\
                  Update everything:\n    tresor update\n\n\
                  Update commands only:\n    tresor update --commands-only\n\n\
                  Restore the state before the last update:\n    tresor update --rollback\n\n\
                  Remove old backups:\n    tresor update --cleanup"
)]
pub struct UpdateArgs {
    /// Only report whether updates are available
    #[arg(long)]
    pub check: bool,

    /// Refresh components even when already up to date
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Do not snapshot the installation before updating
    #[arg(long)]
    pub skip_backup: bool,

    /// Update commands only
    #[arg(long)]
    pub commands_only: bool,

    /// Update agents only
    #[arg(long)]
    pub agents_only: bool,

    /// Update tresor-resources only
    #[arg(long)]
    pub resources_only: bool,

    /// Restore the newest update backup
    #[arg(
        long,
        conflicts_with_all = ["check", "force", "skip_backup", "scope"]
    )]
    pub rollback: bool,

    /// Keep the five newest backups and delete the rest
    #[arg(
        long,
        conflicts_with_all = ["check", "force", "skip_backup", "scope"]
    )]
    pub cleanup: bool,

    /// Remote to fetch from
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Upstream branch to compare against
    #[arg(long, env = "TRESOR_BRANCH", default_value = "main")]
    pub branch: String,
}

impl UpdateArgs {
    pub fn scope(&self) -> UpdateScope {
        if self.commands_only {
            UpdateScope::CommandsOnly
        } else if self.agents_only {
            UpdateScope::AgentsOnly
        } else if self.resources_only {
            UpdateScope::ResourcesOnly
        } else {
            UpdateScope::All
        }
    }
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    tresor completions --shell bash > ~/.bash_completion.d/tresor\n\n\
                  Generate zsh completions:\n    tresor completions --shell zsh > ~/.zfunc/_tresor\n\n\
                  Generate fish completions:\n    tresor completions --shell fish > ~/.config/fish/completions/tresor.fish\n\n\
                  Generate PowerShell completions:\n    tresor completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: Shell,
}
