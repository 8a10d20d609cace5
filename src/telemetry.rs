use std::io;

use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};
use crate::error::CliError;

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Install a global tracing subscriber writing to stderr, so stdout carries
/// nothing but results.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init(logging: &LoggingSettings) -> Result<(), CliError> {
    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter(logging)?)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| CliError::Telemetry(format!("failed to install tracing subscriber: {err}")))
}

/// Global default level plus, when it is more verbose, a directive for this
/// crate's own targets. `RUST_LOG` directives are layered in between.
fn env_filter(logging: &LoggingSettings) -> Result<EnvFilter, CliError> {
    let filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    match logging.crate_level {
        Some(crate_level) if crate_level > logging.level => {
            let directive = format!("{CRATE_TARGET}={crate_level}")
                .parse()
                .map_err(|err| CliError::Telemetry(format!("invalid log directive: {err}")))?;
            Ok(filter.add_directive(directive))
        }
        _ => Ok(filter),
    }
}
