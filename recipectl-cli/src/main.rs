//! recipectl CLI - recipe API server and terminal recipe editor
//!
//! This is the main entry point for the recipectl command-line tool, which provides:
//! - The recipe HTTP API (`serve`)
//! - Offline schema checks for recipe JSON files (`validate`)
//! - A terminal form for creating and editing recipes (`new`, `edit`)
//! - One-shot client commands for scripts (`create`, `list`)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod client;
mod commands;
mod config;
mod tracing_setup;
mod tui;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "recipectl",
    author,
    version,
    about = "Recipe manager: HTTP API, terminal editor and import validation",
    long_about = "Serve a recipe API, edit recipes in a terminal form with dynamic \
                  ingredient and instruction rows, and validate recipe JSON before import."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the recipe HTTP API
    Serve(commands::serve::ServeArgs),
    /// Check recipe JSON files against the import schema
    Validate(commands::validate::ValidateArgs),
    /// Create a recipe in the terminal editor
    New(commands::recipe::NewArgs),
    /// Edit an existing recipe in the terminal editor
    Edit(commands::recipe::EditArgs),
    /// Create a recipe from flags and files (non-interactive)
    Create(commands::recipe::CreateArgs),
    /// List recipes on the server
    List(commands::recipe::ListArgs),
    /// Manage recipectl configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Self::New(_) | Self::Edit(_))
    }
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        interactive: cli.command.is_interactive(),
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Validate(args) => {
            if !commands::run_validate(args)? {
                std::process::exit(1);
            }
        }
        Commands::New(args) => commands::run_new(args).await?,
        Commands::Edit(args) => commands::run_edit(args).await?,
        Commands::Create(args) => commands::run_create(args).await?,
        Commands::List(args) => commands::run_list(args).await?,
        Commands::Config(args) => config::run_config(args)?,
        Commands::Completions(args) => run_completions(args)?,
    }

    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
