//! Command-line arguments and configuration resolution.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gallery_core::Config;

#[derive(Debug, Parser)]
#[command(name = "gallery", version, about = "Browse an art collection from the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file [default: <config dir>/gallery/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API key, overriding the config file and GALLERY_API_KEY
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// API base URL, overriding the config file and GALLERY_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the collection, or the results for QUERY, grouped by maker
    Search {
        query: Option<String>,

        /// Number of pages to fetch
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Show the record of one object
    Detail {
        /// Object number, e.g. SK-C-5
        id: String,
    },
    /// Interactive session: page, open objects and follow their fields
    Browse { query: Option<String> },
}

pub fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("gallery").join("config.toml")
}

/// Resolve the effective configuration from the process environment.
pub fn resolve_config(args: &GlobalArgs) -> anyhow::Result<Config> {
    resolve_config_with(args, |name| std::env::var(name).ok())
}

/// Defaults, then the config file, then `env`, then flags.
pub fn resolve_config_with(
    args: &GlobalArgs,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let path = args.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load(&path)?
        .with_env(env)
        .with_overrides(args.api_key.clone(), args.base_url.clone());
    config
        .validate()
        .with_context(|| format!("configuration from '{}'", path.display()))?;
    Ok(config)
}
