use crate::{
    Action, ActionDef, CatalogEntry,
    FilterOperator::{self, Greater, In, Less, Like, Max, Min, NotIn},
    HttpMethod,
    Termination::{ShortPage, TotalPages},
};

const GET: ActionDef = ActionDef::new(Action::Get, HttpMethod::Get);
const GET_ALL: ActionDef = ActionDef::paged(TotalPages);
const ADD: ActionDef = ActionDef::new(Action::Add, HttpMethod::Post);
const UPDATE: ActionDef = ActionDef::new(Action::Update, HttpMethod::Put);
const DELETE: ActionDef = ActionDef::new(Action::Delete, HttpMethod::Delete);

const NONE: &[FilterOperator] = &[];
const IDS: &[FilterOperator] = &[In, NotIn];
const CATALOG: &[FilterOperator] = &[In, NotIn, Like, Min, Max, Greater, Less];

const SINGLE: &[ActionDef] = &[GET, UPDATE, DELETE];
const COLLECTION: &[ActionDef] = &[GET, GET_ALL, ADD, UPDATE, DELETE];
const APPEND_ONLY: &[ActionDef] = &[GET, GET_ALL, ADD];

const fn entry(
    resource: &'static str,
    endpoint: &'static str,
    filters: &'static [FilterOperator],
    actions: &'static [ActionDef],
) -> CatalogEntry {
    CatalogEntry {
        resource,
        subresource: None,
        endpoint,
        filters,
        actions,
    }
}

const fn sub(
    resource: &'static str,
    subresource: &'static str,
    endpoint: &'static str,
    filters: &'static [FilterOperator],
    actions: &'static [ActionDef],
) -> CatalogEntry {
    CatalogEntry {
        resource,
        subresource: Some(subresource),
        endpoint,
        filters,
        actions,
    }
}

/// BigCommerce store API, paths relative to `/stores/{store_hash}/`.
pub static ENTRIES: &[CatalogEntry] = &[
    // catalog: products
    entry("product", "v3/catalog/products/{product_id}", NONE, SINGLE),
    sub(
        "product",
        "metafield",
        "v3/catalog/products/{product_id}/metafields/{metafield_id}",
        NONE,
        SINGLE,
    ),
    sub(
        "product",
        "metafields",
        "v3/catalog/products/{product_id}/metafields",
        IDS,
        APPEND_ONLY,
    ),
    sub(
        "product",
        "custom-field",
        "v3/catalog/products/{product_id}/custom-fields/{custom_field_id}",
        NONE,
        SINGLE,
    ),
    sub(
        "product",
        "custom-fields",
        "v3/catalog/products/{product_id}/custom-fields",
        NONE,
        APPEND_ONLY,
    ),
    sub(
        "product",
        "image",
        "v3/catalog/products/{product_id}/images/{image_id}",
        NONE,
        SINGLE,
    ),
    sub(
        "product",
        "images",
        "v3/catalog/products/{product_id}/images",
        NONE,
        &[
            GET,
            GET_ALL,
            ActionDef::new(Action::Add, HttpMethod::Post).multipart("image_file"),
        ],
    ),
    entry("products", "v3/catalog/products", CATALOG, COLLECTION),
    // catalog: category trees
    entry(
        "category-tree",
        "v3/catalog/trees/{tree_id}/categories",
        NONE,
        SINGLE,
    ),
    entry("category-trees", "v3/catalog/trees", IDS, COLLECTION),
    sub(
        "category",
        "metafield",
        "v3/catalog/categories/{category_id}/metafields/{metafield_id}",
        NONE,
        SINGLE,
    ),
    sub(
        "category",
        "metafields",
        "v3/catalog/categories/{category_id}/metafields",
        IDS,
        APPEND_ONLY,
    ),
    sub(
        "category",
        "image",
        "v3/catalog/categories/{category_id}/image",
        NONE,
        &[
            GET,
            ActionDef::new(Action::Add, HttpMethod::Post).multipart("image_file"),
            UPDATE,
            DELETE,
        ],
    ),
    entry("categories", "v3/catalog/trees/categories", CATALOG, COLLECTION),
    // customers
    sub(
        "customer",
        "metafields",
        "v3/customers/{customer_id}/metafields",
        IDS,
        &[GET, ADD, UPDATE, DELETE],
    ),
    entry("customers", "v3/customers", CATALOG, COLLECTION),
    // orders (v2 has no filter suffixes and returns bare arrays)
    entry("order", "v2/orders/{order_id}", NONE, &[GET, UPDATE, DELETE]),
    sub(
        "order",
        "metafields",
        "v3/orders/{order_id}/metafields",
        IDS,
        &[GET, ADD, UPDATE, DELETE],
    ),
    entry(
        "orders",
        "v2/orders",
        NONE,
        &[GET, ActionDef::paged(ShortPage), ADD, DELETE],
    ),
    // content
    entry("page", "v3/content/pages/{page_id}", NONE, SINGLE),
    entry("pages", "v3/content/pages", IDS, COLLECTION),
    entry("redirects", "v3/storefront/redirects", IDS, COLLECTION),
    entry("site", "v3/sites/{site_id}", NONE, SINGLE),
    entry("sites", "v3/sites", IDS, APPEND_ONLY),
    entry(
        "widget-template",
        "v3/content/widget-templates/{uuid}",
        NONE,
        SINGLE,
    ),
    sub(
        "widget-template",
        "render",
        "v3/content/widget-templates/{uuid}/preview",
        NONE,
        &[ADD],
    ),
    entry(
        "widget-templates",
        "v3/content/widget-templates",
        IDS,
        APPEND_ONLY,
    ),
    entry("widget", "v3/content/widgets/{uuid}", NONE, SINGLE),
    entry("widgets", "v3/content/widgets", IDS, APPEND_ONLY),
    entry("placement", "v3/content/placements/{uuid}", NONE, SINGLE),
    entry("placements", "v3/content/placements", IDS, APPEND_ONLY),
    entry("regions", "v3/content/regions", NONE, &[GET]),
    entry(
        "custom-template-associations",
        "v3/storefront/custom-template-associations",
        IDS,
        &[
            GET,
            GET_ALL,
            ActionDef::new(Action::Add, HttpMethod::Put),
            UPDATE,
            DELETE,
        ],
    ),
    // themes
    entry(
        "themes",
        "v3/themes",
        NONE,
        &[
            GET,
            GET_ALL,
            ActionDef::new(Action::Upload, HttpMethod::Post).multipart("file"),
        ],
    ),
    sub(
        "themes",
        "custom-templates",
        "v3/themes/custom-templates/{version_uuid}",
        NONE,
        &[GET, GET_ALL],
    ),
    sub(
        "themes",
        "activate",
        "v3/themes/actions/activate",
        NONE,
        &[ActionDef::new(Action::Set, HttpMethod::Post)],
    ),
    entry("theme", "v3/themes/{uuid}", NONE, &[GET, DELETE]),
    // channels
    entry("channels", "v3/channels", IDS, APPEND_ONLY),
    entry("channel", "v3/channels/{channel_id}", NONE, &[GET, UPDATE]),
    sub(
        "channel",
        "active-theme",
        "v3/channels/{channel_id}/active-theme",
        NONE,
        &[GET],
    ),
];
