//! One invocation from argv to stdout.

use std::io::{self, Read};

use tracing::debug;

use crate::args::{ArgumentSet, Invocation};
use crate::config::{self, CliArgs, Settings};
use crate::dispatch::Dispatcher;
use crate::error::CliError;
use crate::help;
use crate::payload::{ComposedRequest, compose_with_input};
use crate::print;
use crate::registry::{EndpointSpec, Registry};
use crate::telemetry;
use crate::transport::HttpTransport;

/// Parse the process arguments, run the verb and print its result.
///
/// # Errors
///
/// Returns the first failure of any stage; nothing is printed to stdout
/// unless every request succeeded.
pub async fn run() -> Result<(), CliError> {
    let (cli, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;
    let registry = Registry::bigcommerce()?;
    execute(&registry, &cli, &settings).await
}

async fn execute(registry: &Registry, cli: &CliArgs, settings: &Settings) -> Result<(), CliError> {
    if cli.list_verbs {
        return print::verbs(&mut io::stdout().lock(), registry);
    }
    if help::requested(&cli.words) {
        return help::render(&mut io::stdout().lock(), registry, &cli.words);
    }

    let (spec, request) = prepare(registry, &cli.words, io::stdin().lock())?;
    if let Ok(rendered) = serde_json::to_string(&request) {
        debug!(verb = %spec.verb, request = %rendered, "composed request");
    }

    let transport = HttpTransport::new(&settings.api)?;
    let result = Dispatcher::new(&transport, settings.pagination.page_size)
        .dispatch(&request, spec)
        .await?;

    print::emit(&mut io::stdout().lock(), &result, settings.output.format)
}

/// Resolve the verb and compose its request without touching the network.
///
/// # Errors
///
/// `UnknownVerb`, `InvalidInput` or any composition error.
pub fn prepare<'r, R: Read>(
    registry: &'r Registry,
    words: &[String],
    input: R,
) -> Result<(&'r EndpointSpec, ComposedRequest), CliError> {
    let invocation = Invocation::parse(words)?;
    let spec = registry.resolve(&invocation.verb)?;
    let arguments = ArgumentSet::classify(&invocation.arguments, spec)?;
    let request = compose_with_input(spec, &arguments, invocation.data()?, input)?;
    Ok((spec, request))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bctoolkit_catalog::HttpMethod;
    use serde_json::json;

    use super::*;

    fn words(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unknown_verb_is_reported_by_name() {
        let registry = Registry::bigcommerce().expect("registry");
        let err = prepare(&registry, &words(&["widgets", "explode"]), io::empty())
            .expect_err("unknown action");
        assert_eq!(err.kind(), "UnknownVerb");

        let err = prepare(&registry, &words(&["gadgets", "get"]), io::empty())
            .expect_err("unknown resource");
        assert!(matches!(err, CliError::UnknownVerb(name) if name == "gadgets get"));
    }

    #[test]
    fn three_word_verb_substitutes_path() {
        let registry = Registry::bigcommerce().expect("registry");
        let (spec, request) = prepare(
            &registry,
            &words(&["product", "metafields", "get-all", "--product-id", "42"]),
            io::empty(),
        )
        .expect("prepare");

        assert!(spec.supports_pagination());
        assert_eq!(request.path(), "v3/catalog/products/42/metafields");
        assert!(request.body.is_none());
    }

    #[test]
    fn stdin_payload_becomes_the_body() {
        let registry = Registry::bigcommerce().expect("registry");
        let (_, request) = prepare(
            &registry,
            &words(&["products", "add", "--data", "-"]),
            Cursor::new(r#"{"name":"Mug","price":9.5}"#),
        )
        .expect("prepare");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.json_body(), Some(&json!({"name": "Mug", "price": 9.5})));
    }

    #[test]
    fn repeated_data_conflicts() {
        let registry = Registry::bigcommerce().expect("registry");
        let err = prepare(
            &registry,
            &words(&["products", "add", "--data", "{}", "--data", "{}"]),
            io::empty(),
        )
        .expect_err("conflict");
        assert_eq!(err.kind(), "ConflictingInput");
    }
}
