//! blogctl CLI - run and administer a small Markdown blog
//!
//! - `serve`: run the HTTP server
//! - `init-db`: create the SQLite schema
//! - `config`: inspect or create the config file
//! - `completions`: shell completion scripts

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use blogctl_core::{load_dotenv, BlogConfig};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "blogctl",
    author,
    version,
    about = "Multi-user Markdown blog served from SQLite",
    long_about = "Run a small server-rendered blog: users register, log in and publish \
                  Markdown posts that are sanitized once and stored as HTML."
)]
struct Cli {
    /// Config file (default: ~/.blogctl/config.toml)
    #[arg(long, global = true, env = "BLOGCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the blog HTTP server
    Serve(commands::serve::ServeArgs),
    /// Create the database tables (safe to run repeatedly)
    InitDb(commands::init_db::InitDbArgs),
    /// Show or create the config file
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
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

fn init_tracing(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    load_dotenv().ok();

    // Broken config must not stop `config path`/`config init` from working,
    // so the error is only surfaced by commands that need the values.
    let config = BlogConfig::load(cli.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.log_level.as_str())
        .unwrap_or("info");
    init_tracing(level).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config?).await?,
        Commands::InitDb(args) => commands::run_init_db(args, config?).await?,
        Commands::Config(args) => commands::run_config(args, cli.config, config)?,
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
