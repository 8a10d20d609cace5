//! `-h` / `--help` after the verb words: usage rendered from the registry.

use std::collections::BTreeMap;
use std::io::Write;

use crate::config::MAX_PAGE_SIZE;
use crate::error::CliError;
use crate::registry::{EndpointSpec, Registry};
use crate::verb::Verb;

const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Whether a help flag appears in a flag position; a help flag given as the
/// value of `--field` is left alone.
#[must_use]
pub fn requested(words: &[String]) -> bool {
    let mut tokens = words.iter();
    while let Some(token) = tokens.next() {
        if HELP_FLAGS.contains(&token.as_str()) {
            return true;
        }
        if token.starts_with("--") && !token.contains('=') {
            tokens.next();
        }
    }
    false
}

/// Print help for a resource, a resource/subresource pair or a full verb.
///
/// # Errors
///
/// `UnknownVerb` when the words name nothing in the catalog.
pub fn render<W: Write>(out: &mut W, registry: &Registry, words: &[String]) -> Result<(), CliError> {
    let verb_words: Vec<String> = words
        .iter()
        .take_while(|word| !word.starts_with('-'))
        .map(|word| word.trim().to_ascii_lowercase())
        .collect();

    let text = match verb_words.as_slice() {
        [] => overview(registry),
        [resource] => group(registry, resource, None)?,
        [resource, second] => match exact(registry, &verb_words) {
            Some(spec) => endpoint(spec),
            None => group(registry, resource, Some(second.as_str()))?,
        },
        _ => endpoint(registry.resolve(&Verb::from_words(&verb_words)?)?),
    };
    out.write_all(text.as_bytes())
        .map_err(|e| CliError::Output(e.to_string()))
}

fn exact<'r>(registry: &'r Registry, words: &[String]) -> Option<&'r EndpointSpec> {
    Verb::from_words(words)
        .ok()
        .and_then(|verb| registry.resolve(&verb).ok())
}

fn overview(registry: &Registry) -> String {
    let mut resources: Vec<&str> = registry
        .specs()
        .map(|spec| spec.verb.resource.as_str())
        .collect();
    resources.dedup();

    let mut text = String::from("Usage: bctoolkit <resource> [<subresource>] <action> [OPTIONS]\n\nResources:\n");
    for resource in resources {
        text.push_str("  ");
        text.push_str(resource);
        text.push('\n');
    }
    text.push_str("\nRun `bctoolkit <resource> --help` for its actions.\n");
    text
}

fn group(registry: &Registry, resource: &str, subresource: Option<&str>) -> Result<String, CliError> {
    let name = match subresource {
        Some(sub) => format!("{resource} {sub}"),
        None => resource.to_string(),
    };

    let mut actions = Vec::new();
    let mut subresources: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for spec in registry.specs().filter(|spec| spec.verb.resource == resource) {
        match (spec.verb.subresource.as_deref(), subresource) {
            (own, wanted) if own == wanted => actions.push(spec),
            (Some(own), None) => subresources
                .entry(own)
                .or_default()
                .push(spec.verb.action.as_str()),
            _ => {}
        }
    }
    if actions.is_empty() && subresources.is_empty() {
        return Err(CliError::UnknownVerb(name));
    }

    let tail = if subresources.is_empty() {
        "<action>"
    } else {
        "[<subresource>] <action>"
    };
    let mut text = format!("Usage: bctoolkit {name} {tail} [OPTIONS]\n");

    if !actions.is_empty() {
        let rows = actions
            .iter()
            .map(|spec| {
                (
                    spec.verb.action.as_str().to_string(),
                    format!("{:<6} {}", spec.method.as_str(), spec.template),
                )
            })
            .collect();
        push_section(&mut text, "Actions", rows);
    }
    if !subresources.is_empty() {
        let rows = subresources
            .into_iter()
            .map(|(sub, actions)| (sub.to_string(), actions.join(", ")))
            .collect();
        push_section(&mut text, "Subresources", rows);
    }

    text.push_str(&format!(
        "\nRun `bctoolkit {name} <action> --help` for the options of one action.\n"
    ));
    Ok(text)
}

fn endpoint(spec: &EndpointSpec) -> String {
    let mut text = format!(
        "Usage: bctoolkit {} [OPTIONS]\n\n  {} {}\n",
        spec.verb,
        spec.method.as_str(),
        spec.template
    );
    let paged = spec.supports_pagination() && spec.action().is_fetch_all();
    if let Some(termination) = spec.pagination.filter(|_| paged) {
        text.push_str(&format!("  Fetches every page ({termination}).\n"));
    }

    let mut rows = Vec::new();
    let params: Vec<&str> = spec.required_path_params().collect();
    for param in &params {
        let flag = if params.len() == 1 {
            format!("--{}, --id TEXT", as_flag(param))
        } else {
            format!("--{} TEXT", as_flag(param))
        };
        rows.push((flag, "Path parameter (required)".to_string()));
    }
    if let Some(field) = spec.multipart_field {
        rows.push((
            format!("--{} PATH", as_flag(field)),
            "File uploaded as multipart form data".to_string(),
        ));
    }
    if !spec.filters.is_empty() {
        let operators: Vec<&str> = spec.filters.iter().map(|op| op.as_str()).collect();
        rows.push((
            "--<field>:<operator> TEXT".to_string(),
            format!("Query filter; operators: {}", operators.join(", ")),
        ));
    }
    let field_help = if spec.method.has_body() {
        "Body field; JSON values keep their type"
    } else {
        "Exact-match query parameter"
    };
    rows.push(("--<field> TEXT".to_string(), field_help.to_string()));
    if spec.method.has_body() {
        rows.push((
            "--data JSON|-".to_string(),
            "Whole request body as JSON, `-` reads standard input; excludes body fields".to_string(),
        ));
    }
    if paged {
        rows.push((
            "--page, --limit INTEGER".to_string(),
            format!("Start page and page size (1-{MAX_PAGE_SIZE})"),
        ));
    }
    push_section(&mut text, "Options", rows);
    text
}

fn push_section(text: &mut String, title: &str, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    text.push_str(&format!("\n{title}:\n"));
    for (left, right) in rows {
        text.push_str(&format!("  {left:<width$}  {right}\n"));
    }
}

fn as_flag(name: &str) -> String {
    name.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn help(raw: &[&str]) -> Result<String, CliError> {
        let registry = Registry::bigcommerce().expect("registry");
        let mut out = Vec::new();
        render(&mut out, &registry, &words(raw))?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn help_flag_is_found_only_in_flag_positions() {
        assert!(requested(&words(&["product", "--help"])));
        assert!(requested(&words(&["product", "get", "--id", "5", "-h"])));
        assert!(requested(&words(&["product", "get", "--id=5", "--help"])));
        assert!(!requested(&words(&["products", "add", "--name", "--help"])));
        assert!(!requested(&words(&["products", "get-all"])));
    }

    #[test]
    fn single_placeholder_lists_the_id_alias() {
        let text = help(&["product", "get", "--help"]).expect("help");
        assert!(text.contains("Usage: bctoolkit product get"), "{text}");
        assert!(text.contains("GET v3/catalog/products/{product_id}"), "{text}");
        assert!(text.contains("--product-id, --id TEXT"), "{text}");
        assert!(text.contains("Exact-match query parameter"), "{text}");
        assert!(!text.contains("--data"), "{text}");
    }

    #[test]
    fn nested_verb_lists_each_path_parameter() {
        let text = help(&["product", "metafield", "update", "--help"]).expect("help");
        assert!(text.contains("--product-id TEXT"), "{text}");
        assert!(text.contains("--metafield-id TEXT"), "{text}");
        assert!(!text.contains("--id TEXT"), "{text}");
        assert!(text.contains("--data JSON|-"), "{text}");
    }

    #[test]
    fn paged_collection_lists_filters_and_paging() {
        let text = help(&["products", "get-all", "-h"]).expect("help");
        assert!(text.contains("Fetches every page (total-pages)"), "{text}");
        assert!(text.contains("operators: in, not_in, like, min, max, greater, less"), "{text}");
        assert!(text.contains("--page, --limit INTEGER"), "{text}");
    }

    #[test]
    fn upload_field_is_listed() {
        let text = help(&["product", "images", "add", "--help"]).expect("help");
        assert!(text.contains("--image-file PATH"), "{text}");
    }

    #[test]
    fn resource_lists_actions_and_subresources() {
        let text = help(&["product", "--help"]).expect("help");
        assert!(text.contains("Usage: bctoolkit product [<subresource>] <action>"), "{text}");
        assert!(text.contains("Actions:"), "{text}");
        assert!(text.contains("delete"), "{text}");
        assert!(text.contains("Subresources:"), "{text}");
        assert!(text.contains("metafields"), "{text}");

        let text = help(&["product", "metafields", "--help"]).expect("help");
        assert!(text.contains("get-all"), "{text}");
        assert!(text.contains("v3/catalog/products/{product_id}/metafields"), "{text}");
        assert!(!text.contains("Subresources:"), "{text}");
    }

    #[test]
    fn bare_help_lists_resources() {
        let text = help(&["--help"]).expect("help");
        assert!(text.contains("Resources:"), "{text}");
        assert!(text.contains("  orders\n"), "{text}");
    }

    #[test]
    fn unknown_names_are_unknown_verbs() {
        let err = help(&["gadgets", "--help"]).expect_err("unknown");
        assert!(matches!(err, CliError::UnknownVerb(name) if name == "gadgets"));

        let err = help(&["product", "gizmos", "--help"]).expect_err("unknown");
        assert_eq!(err.kind(), "UnknownVerb");

        let err = help(&["product", "gizmos", "get", "--help"]).expect_err("unknown");
        assert_eq!(err.kind(), "UnknownVerb");
    }
}
