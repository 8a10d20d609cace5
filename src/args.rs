//! Tokenizing and classifying the `--<field>[:<operator>] <value>` arguments
//! that follow a verb.

use std::collections::BTreeMap;

use bctoolkit_catalog::FilterOperator;

use crate::error::{CliError, CompositionError};
use crate::payload::DataBlob;
use crate::registry::EndpointSpec;
use crate::verb::Verb;

const DATA_FLAG: &str = "data";
const STDIN_SENTINEL: &str = "-";
const ID_ALIAS: &str = "id";

/// One `--name[:op] value` pair as typed, before the endpoint is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    pub name: String,
    pub operator: Option<String>,
    pub value: String,
}

/// Parsed command words: the verb, its raw arguments and the data blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub verb: Verb,
    pub arguments: Vec<RawArgument>,
    pub data: Option<DataBlob>,
    data_repeated: bool,
}

impl Invocation {
    pub fn parse(words: &[String]) -> Result<Self, CliError> {
        let split = words
            .iter()
            .position(|word| word.starts_with("--"))
            .unwrap_or(words.len());
        let (verb_words, rest) = words.split_at(split);
        let verb = Verb::from_words(verb_words)?;

        let mut arguments = Vec::new();
        let mut data = None;
        let mut data_repeated = false;
        let mut tokens = rest.iter();
        while let Some(token) = tokens.next() {
            let Some(flag) = token.strip_prefix("--") else {
                return Err(CliError::invalid_input(format!(
                    "expected `--<field>` but found `{token}`"
                )));
            };
            let (key, value) = match flag.split_once('=') {
                Some((key, value)) => (key, value.to_string()),
                None => {
                    let value = tokens.next().ok_or_else(|| {
                        CliError::invalid_input(format!("missing value for `--{flag}`"))
                    })?;
                    (flag, value.clone())
                }
            };

            let (name, operator) = match key.split_once(':') {
                Some((name, operator)) => (name, Some(operator.to_string())),
                None => (key, None),
            };
            let name = normalize_name(name);
            if name.is_empty() {
                return Err(CliError::invalid_input(format!("empty field name in `{token}`")));
            }

            if name == DATA_FLAG && operator.is_none() {
                data_repeated |= data.is_some();
                data = Some(if value == STDIN_SENTINEL {
                    DataBlob::Stdin
                } else {
                    DataBlob::Literal(value)
                });
                continue;
            }
            arguments.push(RawArgument {
                name,
                operator,
                value,
            });
        }

        Ok(Self {
            verb,
            arguments,
            data,
            data_repeated,
        })
    }

    /// The data blob, rejecting a repeated `--data`.
    pub fn data(&self) -> Result<Option<&DataBlob>, CompositionError> {
        if self.data_repeated {
            return Err(CompositionError::conflicting(
                "--data given more than once",
            ));
        }
        Ok(self.data.as_ref())
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().replace('-', "_")
}

/// How an argument contributes to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArgKind {
    PathParam,
    Filter(FilterOperator),
    Field,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub kind: ArgKind,
    pub name: String,
    pub value: String,
}

/// Classified arguments keyed by `(name, operator)`; the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSet {
    entries: BTreeMap<(String, Option<FilterOperator>), Argument>,
}

impl ArgumentSet {
    /// Tag every raw argument against the resolved endpoint.
    pub fn classify(raw: &[RawArgument], spec: &EndpointSpec) -> Result<Self, CompositionError> {
        let params: Vec<&str> = spec.required_path_params().collect();
        let mut set = Self::default();

        for arg in raw {
            let argument = match &arg.operator {
                Some(suffix) => {
                    let operator = FilterOperator::parse(suffix).ok_or_else(|| {
                        CompositionError::UnsupportedFilter {
                            field: arg.name.clone(),
                            operator: suffix.clone(),
                        }
                    })?;
                    Argument {
                        kind: ArgKind::Filter(operator),
                        name: arg.name.clone(),
                        value: arg.value.clone(),
                    }
                }
                None if params.contains(&arg.name.as_str()) => Argument {
                    kind: ArgKind::PathParam,
                    name: arg.name.clone(),
                    value: arg.value.clone(),
                },
                None if arg.name == ID_ALIAS && params.len() == 1 => Argument {
                    kind: ArgKind::PathParam,
                    name: params[0].to_string(),
                    value: arg.value.clone(),
                },
                None if spec.multipart_field == Some(arg.name.as_str()) => Argument {
                    kind: ArgKind::Upload,
                    name: arg.name.clone(),
                    value: arg.value.clone(),
                },
                None => Argument {
                    kind: ArgKind::Field,
                    name: arg.name.clone(),
                    value: arg.value.clone(),
                },
            };
            set.insert(argument);
        }
        Ok(set)
    }

    pub fn insert(&mut self, argument: Argument) {
        let operator = match argument.kind {
            ArgKind::Filter(operator) => Some(operator),
            _ => None,
        };
        self.entries
            .insert((argument.name.clone(), operator), argument);
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&(name.to_string(), None))
            .filter(|arg| arg.kind == ArgKind::PathParam)
            .map(|arg| arg.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.entries.values()
    }

    /// Arguments that would land in a request body.
    pub fn body_targeted(&self) -> impl Iterator<Item = &Argument> {
        self.iter()
            .filter(|arg| matches!(arg.kind, ArgKind::Field | ArgKind::Upload))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
