use std::io::{self, Cursor, Read};

use bctoolkit_catalog::Action;
use serde_json::json;

use super::*;
use crate::args::Invocation;
use crate::registry::Registry;

struct Prepared {
    spec: EndpointSpec,
    arguments: ArgumentSet,
    data: Option<DataBlob>,
}

fn prepare(words: &[&str]) -> Prepared {
    let words: Vec<String> = words.iter().map(ToString::to_string).collect();
    let invocation = Invocation::parse(&words).expect("parse");
    let registry = Registry::bigcommerce().expect("registry");
    let spec = registry.resolve(&invocation.verb).expect("resolve").clone();
    let arguments = ArgumentSet::classify(&invocation.arguments, &spec).expect("classify");
    Prepared {
        spec,
        arguments,
        data: invocation.data,
    }
}

fn compose_str(words: &[&str], stdin: &str) -> Result<ComposedRequest, CompositionError> {
    let p = prepare(words);
    compose_with_input(&p.spec, &p.arguments, p.data.as_ref(), Cursor::new(stdin.to_string()))
}

/// Fails the test if composition touches standard input.
struct UntouchedInput;

impl Read for UntouchedInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        panic!("standard input must not be read");
    }
}

#[test]
fn add_reads_the_body_from_stdin() {
    let request =
        compose_str(&["products", "add", "--data", "-"], r#"{"name":"X","price":1}"#).expect("compose");

    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path(), "v3/catalog/products");
    assert!(request.query.is_empty());
    assert_eq!(request.json_body(), Some(&json!({"name": "X", "price": 1})));
}

#[test]
fn like_filter_becomes_a_query_parameter() {
    let request = compose_str(&["products", "get", "--name:like", "New"], "").expect("compose");

    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(
        request.query,
        vec![QueryParam {
            name: "name".into(),
            operator: Some(FilterOperator::Like),
            value: "New".into(),
        }]
    );
    assert_eq!(request.query[0].key(), "name:like");
    assert_eq!(request.body, None);
}

#[test]
fn missing_path_param_fails_before_reading_stdin() {
    let p = prepare(&["product", "metafield", "update", "--product-id", "1", "--data", "-"]);
    let err = compose_with_input(&p.spec, &p.arguments, p.data.as_ref(), UntouchedInput)
        .expect_err("metafield_id missing");
    assert_eq!(err, CompositionError::MissingPathParam("metafield_id".into()));
}

#[test]
fn path_params_are_substituted_in_template_order() {
    let request = compose_str(
        &["product", "metafield", "update", "--metafield-id", "9", "--product-id", "3", "--value", "x"],
        "",
    )
    .expect("compose");
    assert_eq!(request.path(), "v3/catalog/products/3/metafields/9");
    assert_eq!(request.json_body(), Some(&json!({"value": "x"})));
}

#[test]
fn stdin_data_with_body_fields_conflicts_in_any_order() {
    for words in [
        &["products", "add", "--data", "-", "--name", "X"][..],
        &["products", "add", "--name", "X", "--data", "-"][..],
    ] {
        let p = prepare(words);
        let err = compose_with_input(&p.spec, &p.arguments, p.data.as_ref(), UntouchedInput)
            .expect_err("conflict");
        assert!(matches!(err, CompositionError::ConflictingInput(_)), "{words:?}");
    }
}

#[test]
fn data_keeps_filters_alongside() {
    let request = compose_str(
        &["products", "update", "--id:in", "1,2", "--data", r#"[{"id":1},{"id":2}]"#],
        "",
    )
    .expect("compose");
    assert_eq!(request.query[0].key(), "id:in");
    assert_eq!(request.json_body(), Some(&json!([{"id": 1}, {"id": 2}])));
}

#[test]
fn invalid_json_is_invalid_data() {
    let err = compose_str(&["products", "add", "--data", "-"], "not json").expect_err("invalid");
    assert!(matches!(err, CompositionError::InvalidData(_)));

    let err = compose_str(&["products", "add", "--data", "{"], "").expect_err("invalid");
    assert!(matches!(err, CompositionError::InvalidData(_)));
}

#[test]
fn data_on_a_read_is_rejected() {
    let err = compose_str(&["products", "get", "--data", "{}"], "").expect_err("no body on GET");
    assert!(matches!(err, CompositionError::InvalidData(_)));
}

#[test]
fn operator_outside_the_endpoint_set_is_unsupported() {
    let err = compose_str(&["orders", "get", "--id:in", "1,2"], "").expect_err("v2 has no filters");
    assert_eq!(
        err,
        CompositionError::UnsupportedFilter {
            field: "id".into(),
            operator: "in".into(),
        }
    );

    let err = compose_str(&["product", "metafields", "get", "--product-id", "1", "--key:like", "a"], "")
        .expect_err("metafields only take id filters");
    assert!(matches!(err, CompositionError::UnsupportedFilter { .. }));
}

#[test]
fn plain_fields_are_exact_matches_on_reads_and_deletes() {
    let request = compose_str(&["products", "get", "--sku", "ABC", "--is-visible", "true"], "")
        .expect("compose");
    let keys: Vec<_> = request.query.iter().map(QueryParam::key).collect();
    assert_eq!(keys, ["is_visible", "sku"]);
    assert_eq!(request.query_value("is_visible"), Some("true"));

    let request = compose_str(&["products", "delete", "--id:in", "4,5"], "").expect("compose");
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.query[0].key(), "id:in");
    assert_eq!(request.body, None);
}

#[test]
fn write_fields_keep_json_types() {
    let request = compose_str(
        &["products", "add", "--name", "Mug", "--price", "9.5", "--is-visible", "false"],
        "",
    )
    .expect("compose");
    assert_eq!(
        request.json_body(),
        Some(&json!({"name": "Mug", "price": 9.5, "is_visible": false}))
    );
}

#[test]
fn upload_field_builds_a_multipart_body() {
    let request = compose_str(
        &["product", "images", "add", "--id", "5", "--image-file", "cat.png", "--is-thumbnail", "true"],
        "",
    )
    .expect("compose");
    assert_eq!(request.path(), "v3/catalog/products/5/images");
    match request.body {
        Some(RequestBody::Multipart {
            fields,
            file_field,
            file_path,
        }) => {
            assert_eq!(file_field, "image_file");
            assert_eq!(file_path, PathBuf::from("cat.png"));
            assert_eq!(fields.get("is_thumbnail").map(String::as_str), Some("true"));
        }
        other => panic!("expected multipart, got {other:?}"),
    }
}

#[test]
fn upload_conflicts_with_data() {
    let err = compose_str(
        &["product", "images", "add", "--id", "5", "--image-file", "cat.png", "--data", "{}"],
        "",
    )
    .expect_err("conflict");
    assert!(matches!(err, CompositionError::ConflictingInput(_)));
}

#[test]
fn compose_is_idempotent_for_literal_data() {
    let p = prepare(&[
        "products",
        "update",
        "--name:like",
        "Mug",
        "--id:in",
        "1,2",
        "--data",
        r#"{"price": 3}"#,
    ]);
    let first = compose_with_input(&p.spec, &p.arguments, p.data.as_ref(), UntouchedInput)
        .expect("first");
    let second = compose_with_input(&p.spec, &p.arguments, p.data.as_ref(), UntouchedInput)
        .expect("second");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).expect("serialize"),
        serde_json::to_vec(&second).expect("serialize")
    );
    assert_eq!(p.spec.action(), Action::Update);
}
