//! Immutable verb → endpoint index built once from the static catalog.

use std::collections::BTreeMap;

use bctoolkit_catalog::{Action, CatalogEntry, FilterOperator, HttpMethod, Termination};

use crate::error::{CliError, RegistryError};
use crate::verb::Verb;

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    Param(String),
}

/// Everything the composer and dispatcher need to know about one verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub verb: Verb,
    pub method: HttpMethod,
    pub template: &'static str,
    pub segments: Vec<PathSegment>,
    pub pagination: Option<Termination>,
    pub filters: &'static [FilterOperator],
    pub multipart_field: Option<&'static str>,
}

impl EndpointSpec {
    #[must_use]
    pub fn action(&self) -> Action {
        self.verb.action
    }

    #[must_use]
    pub fn supports_pagination(&self) -> bool {
        self.pagination.is_some()
    }

    #[must_use]
    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.filters.contains(&operator)
    }

    /// Placeholder names in template order.
    pub fn required_path_params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Param(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    specs: BTreeMap<Verb, EndpointSpec>,
}

impl Registry {
    /// Index `entries`, rejecting duplicate verbs and malformed templates.
    pub fn new(entries: &[CatalogEntry]) -> Result<Self, RegistryError> {
        let mut specs = BTreeMap::new();
        for entry in entries {
            let segments = parse_template(entry.endpoint)?;
            for def in entry.actions {
                let verb = Verb::new(entry.resource, entry.subresource, def.action);
                if def.pagination.is_some() && def.method != HttpMethod::Get {
                    return Err(RegistryError::Pagination {
                        verb: verb.to_string(),
                        method: def.method,
                    });
                }
                if specs.contains_key(&verb) {
                    return Err(RegistryError::DuplicateVerb(verb.to_string()));
                }
                let spec = EndpointSpec {
                    verb: verb.clone(),
                    method: def.method,
                    template: entry.endpoint,
                    segments: segments.clone(),
                    pagination: def.pagination,
                    filters: entry.filters,
                    multipart_field: def.multipart_field,
                };
                specs.insert(verb, spec);
            }
        }
        Ok(Self { specs })
    }

    /// The shipped BigCommerce catalog.
    pub fn bigcommerce() -> Result<Self, RegistryError> {
        Self::new(bctoolkit_catalog::ENTRIES)
    }

    pub fn resolve(&self, verb: &Verb) -> Result<&EndpointSpec, CliError> {
        let normalized = Verb::new(&verb.resource, verb.subresource.as_deref(), verb.action);
        self.specs
            .get(&normalized)
            .ok_or_else(|| CliError::UnknownVerb(normalized.to_string()))
    }

    /// All specs ordered by verb.
    pub fn specs(&self) -> impl Iterator<Item = &EndpointSpec> {
        self.specs.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn parse_template(template: &str) -> Result<Vec<PathSegment>, RegistryError> {
    let trimmed = template.trim_matches('/');
    if trimmed.is_empty() {
        return Err(RegistryError::template(template, "path is empty"));
    }

    let mut segments = Vec::new();
    for raw in trimmed.split('/') {
        if raw.is_empty() {
            return Err(RegistryError::template(template, "empty segment"));
        }
        let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if is_param_name(name) => {
                if segments.contains(&PathSegment::Param(name.to_string())) {
                    return Err(RegistryError::template(
                        template,
                        format!("placeholder `{name}` appears twice"),
                    ));
                }
                PathSegment::Param(name.to_string())
            }
            _ if raw.contains(['{', '}']) => {
                return Err(RegistryError::template(
                    template,
                    format!("placeholder must fill a whole segment: `{raw}`"),
                ));
            }
            _ => PathSegment::Literal(raw.to_string()),
        };
        segments.push(segment);
    }
    Ok(segments)
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests;
