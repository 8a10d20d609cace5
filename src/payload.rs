//! Payload composition: path substitution, data blob handling and the
//! query/body split.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;

use bctoolkit_catalog::{FilterOperator, HttpMethod};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::{ArgKind, ArgumentSet};
use crate::error::CompositionError;
use crate::registry::{EndpointSpec, PathSegment};

/// Source of a bulk request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataBlob {
    Literal(String),
    /// `--data -`: read all of standard input before building the request.
    Stdin,
}

impl DataBlob {
    fn resolve<R: Read>(&self, mut input: R) -> Result<Value, CompositionError> {
        let text = match self {
            DataBlob::Literal(text) => text.clone(),
            DataBlob::Stdin => {
                let mut buf = String::new();
                input.read_to_string(&mut buf).map_err(|err| {
                    CompositionError::invalid_data(format!("failed to read standard input: {err}"))
                })?;
                buf
            }
        };
        serde_json::from_str(text.trim())
            .map_err(|err| CompositionError::invalid_data(format!("data is not valid JSON: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
    pub value: String,
}

impl QueryParam {
    #[must_use]
    pub fn exact(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            operator: None,
            value: value.to_string(),
        }
    }

    /// Wire key, e.g. `name:like`.
    #[must_use]
    pub fn key(&self) -> String {
        match self.operator {
            Some(op) => format!("{}:{op}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RequestBody {
    Json { value: Value },
    Multipart {
        fields: BTreeMap<String, String>,
        file_field: String,
        file_path: PathBuf,
    },
}

/// A fully resolved request, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedRequest {
    pub method: HttpMethod,
    pub segments: Vec<String>,
    pub query: Vec<QueryParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
}

impl ComposedRequest {
    /// Path relative to the store root, unencoded.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|param| param.operator.is_none() && param.name == name)
            .map(|param| param.value.as_str())
    }

    /// The JSON body, if any.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json { value }) => Some(value),
            _ => None,
        }
    }
}

/// Compose a request, reading standard input for `DataBlob::Stdin`.
pub fn compose(
    spec: &EndpointSpec,
    arguments: &ArgumentSet,
    data: Option<&DataBlob>,
) -> Result<ComposedRequest, CompositionError> {
    compose_with_input(spec, arguments, data, io::stdin().lock())
}

pub fn compose_with_input<R: Read>(
    spec: &EndpointSpec,
    arguments: &ArgumentSet,
    data: Option<&DataBlob>,
    input: R,
) -> Result<ComposedRequest, CompositionError> {
    let segments = substitute_path(spec, arguments)?;

    let mut query = Vec::new();
    for arg in arguments.iter() {
        if let ArgKind::Filter(operator) = arg.kind {
            if !spec.allows(operator) {
                return Err(CompositionError::UnsupportedFilter {
                    field: arg.name.clone(),
                    operator: operator.to_string(),
                });
            }
            query.push(QueryParam {
                name: arg.name.clone(),
                operator: Some(operator),
                value: arg.value.clone(),
            });
        }
    }

    let body = match data {
        Some(blob) => Some(body_from_blob(spec, arguments, blob, input)?),
        None => body_from_fields(spec, arguments, &mut query),
    };

    query.sort_by(|a, b| (&a.name, a.operator).cmp(&(&b.name, b.operator)));

    Ok(ComposedRequest {
        method: spec.method,
        segments,
        query,
        body,
    })
}

fn substitute_path(
    spec: &EndpointSpec,
    arguments: &ArgumentSet,
) -> Result<Vec<String>, CompositionError> {
    spec.segments
        .iter()
        .map(|segment| match segment {
            PathSegment::Literal(literal) => Ok(literal.clone()),
            PathSegment::Param(name) => arguments
                .path_param(name)
                .filter(|value| !value.trim().is_empty())
                .map(ToString::to_string)
                .ok_or_else(|| CompositionError::MissingPathParam(name.clone())),
        })
        .collect()
}

fn body_from_blob<R: Read>(
    spec: &EndpointSpec,
    arguments: &ArgumentSet,
    blob: &DataBlob,
    input: R,
) -> Result<RequestBody, CompositionError> {
    if !spec.method.has_body() {
        return Err(CompositionError::invalid_data(format!(
            "{} {} takes no request body",
            spec.method, spec.verb
        )));
    }

    let conflicts: Vec<String> = arguments
        .body_targeted()
        .map(|arg| format!("--{}", arg.name))
        .collect();
    if !conflicts.is_empty() {
        return Err(CompositionError::conflicting(format!(
            "--data cannot be combined with body fields {}",
            conflicts.join(", ")
        )));
    }

    let value = blob.resolve(input)?;
    Ok(RequestBody::Json { value })
}

fn body_from_fields(
    spec: &EndpointSpec,
    arguments: &ArgumentSet,
    query: &mut Vec<QueryParam>,
) -> Option<RequestBody> {
    let mut fields = Map::new();
    let mut upload = None;

    for arg in arguments.iter() {
        match arg.kind {
            ArgKind::Field if spec.method.has_body() => {
                fields.insert(arg.name.clone(), field_value(&arg.value));
            }
            ArgKind::Field => query.push(QueryParam::exact(&arg.name, &arg.value)),
            ArgKind::Upload => upload = Some(arg),
            ArgKind::PathParam | ArgKind::Filter(_) => {}
        }
    }

    if let Some(file) = upload {
        let fields = arguments
            .iter()
            .filter(|arg| arg.kind == ArgKind::Field)
            .map(|arg| (arg.name.clone(), arg.value.clone()))
            .collect();
        return Some(RequestBody::Multipart {
            fields,
            file_field: file.name.clone(),
            file_path: PathBuf::from(&file.value),
        });
    }

    (!fields.is_empty()).then(|| RequestBody::Json {
        value: Value::Object(fields),
    })
}

/// Values that parse as JSON keep their type (`1`, `true`, `[1,2]`);
/// anything else is sent as a string.
fn field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests;
