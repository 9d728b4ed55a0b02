use std::path::PathBuf;

use anyhow::{Context, Result};
use blogctl_core::BlogConfig;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Show the effective config (file + environment), secret redacted
    Show,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// `path` is the `--config` override, `loaded` the result of loading it.
pub fn run_config(
    args: ConfigArgs,
    path: Option<PathBuf>,
    loaded: Result<BlogConfig>,
) -> Result<()> {
    let path = path.unwrap_or_else(BlogConfig::config_path);
    match args.command {
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::Show => run_show(loaded?),
        ConfigCommands::Init(args) => run_init(args, &path),
    }
}

fn run_path(path: &std::path::Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

fn run_show(config: BlogConfig) -> Result<()> {
    let redacted = BlogConfig {
        secret_key: redact(&config.secret_key, config.uses_default_secret()),
        ..config
    };
    let toml_str = toml::to_string_pretty(&redacted).context("Failed to serialize config")?;
    print!("{}", toml_str);
    Ok(())
}

fn redact(secret: &str, is_default: bool) -> String {
    if is_default {
        format!("{} (built-in default)", secret)
    } else {
        format!("<{} characters, hidden>", secret.chars().count())
    }
}

fn run_init(args: InitArgs, path: &std::path::Path) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    BlogConfig::default().save_to(path)?;

    println!("Created config at: {}", path.display());
    println!("\nNext steps:");
    println!("  1. Set secret_key to a long random string (or export SECRET_KEY)");
    println!("  2. Run: blogctl init-db");
    println!("  3. Run: blogctl serve");

    Ok(())
}
