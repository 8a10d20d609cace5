use bctoolkit_catalog::HttpMethod;
use thiserror::Error;

use crate::config::LoadError;

/// Everything that can abort an invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no endpoint for `{0}` (run with --list-verbs to see the catalog)")]
    UnknownVerb(String),
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("api returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("store hash is required (use --store-hash or BIGCOMMERCE_STORE_HASH)")]
    MissingStoreHash,
    #[error("auth token is required (use --auth-token or BIGCOMMERCE_AUTH_TOKEN)")]
    MissingAuthToken,
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("invalid endpoint catalog: {0}")]
    Registry(#[from] RegistryError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("failed to write output: {0}")]
    Output(String),
}

impl CliError {
    /// Stable name of the error kind, printed ahead of the message.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::UnknownVerb(_) => "UnknownVerb",
            CliError::Composition(err) => err.kind(),
            CliError::Transport(_) => "TransportError",
            CliError::Api { .. } => "ApiError",
            CliError::UnexpectedResponse(_) => "UnexpectedResponse",
            CliError::MissingStoreHash => "MissingStoreHash",
            CliError::MissingAuthToken => "MissingAuthToken",
            CliError::Config(_) => "ConfigError",
            CliError::Registry(_) => "RegistryError",
            CliError::InvalidInput(_) => "InvalidInput",
            CliError::Telemetry(_) => "TelemetryError",
            CliError::Output(_) => "OutputError",
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// The request could not be legally built from the supplied inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("missing path parameter `{0}`")]
    MissingPathParam(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("conflicting input: {0}")]
    ConflictingInput(String),
    #[error("unsupported filter `{field}:{operator}` for this endpoint")]
    UnsupportedFilter { field: String, operator: String },
}

impl CompositionError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CompositionError::MissingPathParam(_) => "MissingPathParam",
            CompositionError::InvalidData(_) => "InvalidData",
            CompositionError::ConflictingInput(_) => "ConflictingInput",
            CompositionError::UnsupportedFilter { .. } => "UnsupportedFilter",
        }
    }

    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub(crate) fn conflicting(message: impl Into<String>) -> Self {
        Self::ConflictingInput(message.into())
    }
}

/// Connection-level failures; never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to read upload file {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid header value: {0}")]
    Header(String),
}

/// Rejections raised while indexing the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("verb `{0}` is declared more than once")]
    DuplicateVerb(String),
    #[error("malformed path template `{template}`: {reason}")]
    Template { template: String, reason: String },
    #[error("`{verb}` declares pagination but {method} cannot page")]
    Pagination { verb: String, method: HttpMethod },
}

impl RegistryError {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        Self::Template {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
