use bctoolkit_catalog::ActionDef;

use super::*;

const GET: ActionDef = ActionDef::new(Action::Get, HttpMethod::Get);

fn single(endpoint: &'static str, actions: &'static [ActionDef]) -> [CatalogEntry; 1] {
    [CatalogEntry {
        resource: "things",
        subresource: None,
        endpoint,
        filters: &[],
        actions,
    }]
}

#[test]
fn shipped_catalog_builds() {
    let registry = Registry::bigcommerce().expect("catalog is valid");
    assert!(!registry.is_empty());
}

#[test]
fn resolve_is_case_insensitive_and_exact() {
    let registry = Registry::bigcommerce().expect("registry");
    let spec = registry
        .resolve(&Verb::new("PRODUCTS", None, Action::GetAll))
        .expect("products get-all");
    assert_eq!(spec.method, HttpMethod::Get);
    assert_eq!(spec.template, "v3/catalog/products");
    assert!(spec.supports_pagination());

    let spec = registry
        .resolve(&Verb::new("product", Some("Metafield"), Action::Update))
        .expect("product metafield update");
    assert_eq!(spec.method, HttpMethod::Put);
    assert_eq!(
        spec.required_path_params().collect::<Vec<_>>(),
        ["product_id", "metafield_id"]
    );
}

#[test]
fn unmatched_verb_is_named_in_the_error() {
    let registry = Registry::bigcommerce().expect("registry");
    let err = registry
        .resolve(&Verb::new("product", Some("metafield"), Action::GetAll))
        .expect_err("no get-all on a single metafield");
    match err {
        CliError::UnknownVerb(verb) => assert_eq!(verb, "product metafield get-all"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn no_prefix_matching_between_resources() {
    let registry = Registry::bigcommerce().expect("registry");
    assert!(registry.resolve(&Verb::new("prod", None, Action::Get)).is_err());
    assert!(registry.resolve(&Verb::new("products", Some("metafields"), Action::Get)).is_err());
}

#[test]
fn duplicate_verbs_are_rejected() {
    static ACTIONS: &[ActionDef] = &[GET, GET];
    let err = Registry::new(&single("v3/things", ACTIONS)).expect_err("duplicate");
    assert_eq!(err, RegistryError::DuplicateVerb("things get".into()));
}

#[test]
fn placeholders_must_fill_whole_segments() {
    static ACTIONS: &[ActionDef] = &[GET];
    for template in ["v3/things/id-{id}", "v3/things/{id", "v3//things", "v3/{a}/{a}", "/"] {
        let err = Registry::new(&single(template, ACTIONS)).expect_err(template);
        assert!(matches!(err, RegistryError::Template { .. }), "{template}");
    }
}

#[test]
fn pagination_requires_get() {
    static ACTIONS: &[ActionDef] = &[ActionDef {
        action: Action::GetAll,
        method: HttpMethod::Post,
        pagination: Some(Termination::TotalPages),
        multipart_field: None,
    }];
    let err = Registry::new(&single("v3/things", ACTIONS)).expect_err("post cannot page");
    assert!(matches!(err, RegistryError::Pagination { .. }));
}

#[test]
fn template_segments_parse_in_order() {
    let segments = parse_template("v3/catalog/products/{product_id}/images").expect("parse");
    assert_eq!(
        segments,
        vec![
            PathSegment::Literal("v3".into()),
            PathSegment::Literal("catalog".into()),
            PathSegment::Literal("products".into()),
            PathSegment::Param("product_id".into()),
            PathSegment::Literal("images".into()),
        ]
    );
}
