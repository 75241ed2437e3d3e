use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Relation alias recorded when a media item is moved to the recycle bin.
pub const DEFAULT_PARENT_RELATION_ALIAS: &str = "relateParentMediaFolderOnDelete";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub parent_relation_alias: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Media recycle bin API")]
pub struct Args {
    /// Host to bind to (overrides RECYCLE_BIN_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides RECYCLE_BIN_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides RECYCLE_BIN_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Relation alias marking a trashed item's original parent
    /// (overrides RECYCLE_BIN_PARENT_RELATION_ALIAS)
    #[arg(long)]
    pub parent_relation_alias: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |key| env::var(key))?;
        Ok((cfg, migrate))
    }

    /// Merge CLI args over values read through `var`, falling back to defaults.
    fn merge<F>(args: Args, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = var("RECYCLE_BIN_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match var("RECYCLE_BIN_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing RECYCLE_BIN_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading RECYCLE_BIN_PORT"),
        };
        let env_db = var("RECYCLE_BIN_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/recycle_bin.db".into());
        let env_alias = var("RECYCLE_BIN_PARENT_RELATION_ALIAS")
            .unwrap_or_else(|_| DEFAULT_PARENT_RELATION_ALIAS.into());

        let parent_relation_alias = args.parent_relation_alias.unwrap_or(env_alias);
        if parent_relation_alias.trim().is_empty() {
            anyhow::bail!("parent relation alias must not be empty");
        }

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            parent_relation_alias,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
