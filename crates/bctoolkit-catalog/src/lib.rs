//! Static endpoint catalog for the BigCommerce management API.
//!
//! The catalog is plain data: which resource/subresource/action triple maps
//! to which HTTP method and path template, which filter operators the
//! endpoint accepts, and how its collection pages terminate. The `bctoolkit`
//! registry validates and indexes it once at startup.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

mod bigcommerce;

pub use bigcommerce::ENTRIES;

/// Action vocabulary accepted as the last verb word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Get,
    GetAll,
    Add,
    Update,
    Delete,
    Upload,
    Set,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Get,
        Action::GetAll,
        Action::Add,
        Action::Update,
        Action::Delete,
        Action::Upload,
        Action::Set,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::GetAll => "get-all",
            Action::Add => "add",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Upload => "upload",
            Action::Set => "set",
        }
    }

    /// Whether the action aggregates every page of a collection.
    #[must_use]
    pub fn is_fetch_all(self) -> bool {
        matches!(self, Action::GetAll)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Write methods carry argument fields in a JSON body; reads and deletes
    /// carry them in the query string.
    #[must_use]
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison suffix accepted on query arguments, e.g. `--name:like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    In,
    NotIn,
    Like,
    Min,
    Max,
    Greater,
    Less,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 7] = [
        FilterOperator::In,
        FilterOperator::NotIn,
        FilterOperator::Like,
        FilterOperator::Min,
        FilterOperator::Max,
        FilterOperator::Greater,
        FilterOperator::Less,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
            FilterOperator::Like => "like",
            FilterOperator::Min => "min",
            FilterOperator::Max => "max",
            FilterOperator::Greater => "greater",
            FilterOperator::Less => "less",
        }
    }

    /// Parse an operator suffix; `not-in` is accepted for `not_in`.
    #[must_use]
    pub fn parse(suffix: &str) -> Option<Self> {
        let normalized = suffix.trim().to_ascii_lowercase().replace('-', "_");
        FilterOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a paginated collection signals its last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// v3 envelope: `{"data": [...], "meta": {"pagination": {"total_pages": N}}}`.
    TotalPages,
    /// v2 bare arrays: a page shorter than the page size is the last one.
    ShortPage,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::TotalPages => "total-pages",
            Termination::ShortPage => "short-page",
        })
    }
}

/// One action offered by a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDef {
    pub action: Action,
    pub method: HttpMethod,
    pub pagination: Option<Termination>,
    /// Argument that names a local file to send as a multipart part.
    pub multipart_field: Option<&'static str>,
}

impl ActionDef {
    #[must_use]
    pub const fn new(action: Action, method: HttpMethod) -> Self {
        Self {
            action,
            method,
            pagination: None,
            multipart_field: None,
        }
    }

    #[must_use]
    pub const fn paged(termination: Termination) -> Self {
        Self {
            action: Action::GetAll,
            method: HttpMethod::Get,
            pagination: Some(termination),
            multipart_field: None,
        }
    }

    #[must_use]
    pub const fn multipart(self, field: &'static str) -> Self {
        Self {
            multipart_field: Some(field),
            ..self
        }
    }
}

/// A resource (optionally scoped by a subresource) bound to one path template.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub resource: &'static str,
    pub subresource: Option<&'static str>,
    /// Path relative to the store root, placeholders written as `{name}`.
    pub endpoint: &'static str,
    pub filters: &'static [FilterOperator],
    pub actions: &'static [ActionDef],
}
