use std::path::PathBuf;

use clap::{Parser, builder::BoolishValueParser};

use crate::print::OutputFormat;

/// Command-line arguments for the `bctoolkit` binary.
///
/// Global options go before the verb; everything from the first verb word
/// on is handed to the dispatch engine untouched.
#[derive(Debug, Parser)]
#[command(
    name = "bctoolkit",
    version,
    about = "BigCommerce API from the shell",
    after_help = "Verb syntax: <resource> [<subresource>] <action> [--<field>[:<operator>] <value>]... [--data <JSON>|-]"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BCTOOLKIT_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Store hash; defaults to BIGCOMMERCE_STORE_HASH.
    #[arg(long = "store-hash", env = "BIGCOMMERCE_STORE_HASH", value_name = "HASH")]
    pub store_hash: Option<String>,

    /// API token; defaults to BIGCOMMERCE_AUTH_TOKEN.
    #[arg(
        long = "auth-token",
        env = "BIGCOMMERCE_AUTH_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub auth_token: Option<String>,

    /// Override the API root URL.
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the per-request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Override the page size used by get-all.
    #[arg(long = "page-size", value_name = "COUNT")]
    pub page_size: Option<u32>,

    /// Output format for results.
    #[arg(long = "output", value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Log the composed request and each page fetched.
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Print every known verb and exit.
    #[arg(long = "list-verbs")]
    pub list_verbs: bool,

    /// `<resource> [<subresource>] <action>` followed by its arguments.
    #[arg(
        value_name = "VERB",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 1..,
        required_unless_present = "list_verbs"
    )]
    pub words: Vec<String>,
}
