pub mod toml_config;

use crate::core::fetcher::Credential;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_endpoint_path, validate_host, validate_non_empty_string, validate_required_field,
    validate_resolved, Validate,
};
use toml_config::{EndpointConfig, TomlConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "movie-digest")]
#[command(about = "Daily box office and movie search summaries")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "KOBIS API key (overrides the config file)")]
    pub kobis_key: Option<String>,

    #[arg(long, global = true, help = "Daum API key (overrides the config file)")]
    pub daum_key: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print yesterday's (or --date) daily box office
    BoxOffice {
        #[arg(long, help = "Target date as YYYYMMDD")]
        date: Option<String>,
    },
    /// Search movies by name
    Search { query: String },
    /// Run both lookups concurrently
    All {
        #[arg(long, help = "Target date as YYYYMMDD")]
        date: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },
}

/// 合併設定檔與命令列參數後的最終設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub box_office: EndpointConfig,
    pub movie_search: EndpointConfig,
    pub default_query: String,
}

impl AppConfig {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            box_office: config.box_office(),
            movie_search: config.movie_search(),
            default_query: config.default_query(),
        }
    }

    /// 命令列給的金鑰優先於設定檔
    pub fn with_keys(mut self, kobis_key: Option<String>, daum_key: Option<String>) -> Self {
        if let Some(value) = kobis_key {
            override_credential(&mut self.box_office, "key", value);
        }
        if let Some(value) = daum_key {
            override_credential(&mut self.movie_search, "apiKey", value);
        }
        self
    }

    #[cfg(feature = "cli")]
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        Ok(Self::from_toml(&file_config).with_keys(cli.kobis_key.clone(), cli.daum_key.clone()))
    }
}

fn override_credential(endpoint: &mut EndpointConfig, default_param: &str, value: String) {
    let param = endpoint
        .fetcher
        .credential
        .as_ref()
        .map(|c| c.param.clone())
        .unwrap_or_else(|| default_param.to_string());
    endpoint.fetcher.credential = Some(Credential { param, value });
}

fn validate_endpoint(section: &str, endpoint: &EndpointConfig) -> Result<()> {
    validate_host(
        &format!("{}.host", section),
        &endpoint.fetcher.scheme,
        &endpoint.fetcher.host,
    )?;
    validate_endpoint_path(&format!("{}.path", section), &endpoint.path)?;

    let field = format!("{}.credential", section);
    let credential = validate_required_field(&field, &endpoint.fetcher.credential)?;
    validate_non_empty_string(&format!("{}.credential_param", section), &credential.param)?;
    validate_non_empty_string(&field, &credential.value)?;
    validate_resolved(&field, &credential.value)?;
    Ok(())
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_endpoint("box_office", &self.box_office)?;
        validate_endpoint("movie_search", &self.movie_search)?;
        validate_non_empty_string("search.default_query", &self.default_query)?;
        Ok(())
    }
}
