//! Page cursor for fetch-all actions.
//!
//! `PageState` is a plain value: `advance` derives the next state from the
//! previous one and the metadata of the page just received, so the
//! termination rules can be tested without a network.

use std::num::NonZeroU32;

use bctoolkit_catalog::Termination;
use serde_json::Value;

use crate::error::CliError;

pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: u32,
    page_size: NonZeroU32,
    exhausted: bool,
}

/// What a single page response says about the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub item_count: usize,
    pub total_pages: Option<u64>,
}

impl PageState {
    #[must_use]
    pub fn start(first_page: u32, page_size: NonZeroU32) -> Self {
        Self {
            page: first_page.max(FIRST_PAGE),
            page_size,
            exhausted: false,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// `page` and `limit` for the next request.
    #[must_use]
    pub fn query_pairs(&self) -> [(String, String); 2] {
        [
            (PAGE_PARAM.to_string(), self.page.to_string()),
            (LIMIT_PARAM.to_string(), self.page_size.to_string()),
        ]
    }

    #[must_use]
    pub fn advance(self, termination: Termination, meta: &PageMeta) -> Self {
        if self.exhausted {
            return self;
        }

        let last = meta.item_count == 0
            || self.page == u32::MAX
            || match termination {
                Termination::TotalPages => meta
                    .total_pages
                    .is_none_or(|total| u64::from(self.page) >= total),
                Termination::ShortPage => {
                    u64::try_from(meta.item_count).unwrap_or(u64::MAX)
                        < u64::from(self.page_size.get())
                }
            };

        if last {
            Self {
                exhausted: true,
                ..self
            }
        } else {
            Self {
                page: self.page + 1,
                ..self
            }
        }
    }
}

/// Items and metadata pulled out of one page body.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub meta: PageMeta,
}

impl Page {
    /// Decode a page according to the endpoint's envelope convention.
    /// An empty body (v2 answers 204 past the last page) is an empty page.
    pub fn decode(termination: Termination, body: &[u8]) -> Result<Self, CliError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                items: Vec::new(),
                meta: PageMeta::default(),
            });
        }

        let value: Value = serde_json::from_slice(body).map_err(|err| {
            CliError::UnexpectedResponse(format!("page body is not JSON: {err}"))
        })?;

        let (items, total_pages) = match (termination, value) {
            (Termination::TotalPages, Value::Object(mut envelope)) => {
                let total_pages = envelope
                    .get("meta")
                    .and_then(|meta| meta.pointer("/pagination/total_pages"))
                    .and_then(Value::as_u64);
                match envelope.remove("data") {
                    Some(Value::Array(items)) => (items, total_pages),
                    _ => {
                        return Err(CliError::UnexpectedResponse(
                            "page envelope has no `data` array".into(),
                        ));
                    }
                }
            }
            (Termination::ShortPage, Value::Array(items)) => (items, None),
            (termination, _) => {
                return Err(CliError::UnexpectedResponse(format!(
                    "page does not match the {termination} convention"
                )));
            }
        };

        Ok(Self {
            meta: PageMeta {
                item_count: items.len(),
                total_pages,
            },
            items,
        })
    }
}
