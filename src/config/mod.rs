//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::print::OutputFormat;

mod cli;

pub use cli::CliArgs;

const LOCAL_CONFIG_BASENAME: &str = "bctoolkit";
const ENV_PREFIX: &str = "BCTOOLKIT";
const DEFAULT_API_URL: &str = "https://api.bigcommerce.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 50;
/// BigCommerce rejects `limit` above this value.
pub(crate) const MAX_PAGE_SIZE: u32 = 250;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub pagination: PaginationSettings,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub store_hash: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PaginationSettings {
    pub page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    /// Level for this crate's own targets; dependencies stay at `level`.
    pub crate_level: Option<LevelFilter>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the process arguments and load settings.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_cli_overrides(cli);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    pagination: RawPaginationSettings,
    logging: RawLoggingSettings,
    output: RawOutputSettings,
}

impl RawSettings {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(url) = cli.api_url.as_ref() {
            self.api.url = Some(url.clone());
        }
        if let Some(hash) = cli.store_hash.as_ref() {
            self.api.store_hash = Some(hash.clone());
        }
        if let Some(token) = cli.auth_token.as_ref() {
            self.api.auth_token = Some(token.clone());
        }
        if let Some(seconds) = cli.timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(size) = cli.page_size {
            self.pagination.page_size = Some(size);
        }
        if cli.verbose {
            self.logging.crate_level = Some("debug".to_string());
        }
        if let Some(level) = cli.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = cli.log_json {
            self.logging.json = Some(json);
        }
        if let Some(format) = cli.output {
            self.output.format = Some(format);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            pagination,
            logging,
            output,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            pagination: build_pagination_settings(&pagination)?,
            logging: build_logging_settings(logging)?,
            output: OutputSettings {
                format: output.format.unwrap_or_default(),
            },
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api.url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let base_url = Url::parse(raw_url.trim())
        .map_err(|err| LoadError::invalid("api.url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid("api.url", "scheme must be http or https"));
    }

    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        store_hash: non_blank(api.store_hash),
        auth_token: non_blank(api.auth_token),
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_pagination_settings(
    pagination: &RawPaginationSettings,
) -> Result<PaginationSettings, LoadError> {
    let value = pagination.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if value > MAX_PAGE_SIZE {
        return Err(LoadError::invalid(
            "pagination.page_size",
            format!("must not exceed {MAX_PAGE_SIZE}"),
        ));
    }
    let page_size = NonZeroU32::new(value)
        .ok_or_else(|| LoadError::invalid("pagination.page_size", "must be greater than zero"))?;
    Ok(PaginationSettings { page_size })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => parse_level("logging.level", &level)?,
        None => LevelFilter::WARN,
    };
    let crate_level = logging
        .crate_level
        .map(|level| parse_level("logging.crate_level", &level))
        .transpose()?;

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings {
        level,
        crate_level,
        format,
    })
}

fn parse_level(key: &'static str, raw: &str) -> Result<LevelFilter, LoadError> {
    LevelFilter::from_str(raw)
        .map_err(|err| LoadError::invalid(key, format!("failed to parse: {err}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    url: Option<String>,
    store_hash: Option<String>,
    auth_token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPaginationSettings {
    page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    crate_level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOutputSettings {
    format: Option<OutputFormat>,
}
