//! Request dispatch: one call, or a strictly sequential page loop whose
//! result is all items or an error.

use std::num::NonZeroU32;

use bctoolkit_catalog::Termination;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::config::MAX_PAGE_SIZE;
use crate::error::CliError;
use crate::pagination::{FIRST_PAGE, LIMIT_PARAM, PAGE_PARAM, Page, PageState};
use crate::payload::ComposedRequest;
use crate::registry::EndpointSpec;
use crate::transport::{HttpResponse, OutgoingRequest, Transport};

/// What the emitter receives.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSequence {
    Single(Value),
    Aggregated(Vec<Value>),
}

pub struct Dispatcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    page_size: NonZeroU32,
}

impl<'a, T: Transport + ?Sized> Dispatcher<'a, T> {
    pub fn new(transport: &'a T, page_size: NonZeroU32) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    #[instrument(skip_all, fields(verb = %spec.verb, path = %request.path()))]
    pub async fn dispatch(
        &self,
        request: &ComposedRequest,
        spec: &EndpointSpec,
    ) -> Result<ResultSequence, CliError> {
        match spec.pagination {
            Some(termination) if spec.action().is_fetch_all() => {
                self.fetch_all(request, termination).await
            }
            _ => self.fetch_one(request).await,
        }
    }

    async fn fetch_one(&self, request: &ComposedRequest) -> Result<ResultSequence, CliError> {
        let query: Vec<(String, String)> = request
            .query
            .iter()
            .map(|param| (param.key(), param.value.clone()))
            .collect();
        let response = self
            .transport
            .send(OutgoingRequest {
                method: request.method,
                segments: &request.segments,
                query: &query,
                body: request.body.as_ref(),
            })
            .await?
            .into_success()?;
        Ok(ResultSequence::Single(single_value(&response)))
    }

    async fn fetch_all(
        &self,
        request: &ComposedRequest,
        termination: Termination,
    ) -> Result<ResultSequence, CliError> {
        let (first_page, page_size) = self.paging_overrides(request)?;
        let base_query: Vec<(String, String)> = request
            .query
            .iter()
            .filter(|param| {
                !(param.operator.is_none()
                    && (param.name == PAGE_PARAM || param.name == LIMIT_PARAM))
            })
            .map(|param| (param.key(), param.value.clone()))
            .collect();

        let mut state = PageState::start(first_page, page_size);
        let mut items = Vec::new();
        while !state.is_exhausted() {
            let mut query = base_query.clone();
            query.extend(state.query_pairs());

            let response = self
                .transport
                .send(OutgoingRequest {
                    method: request.method,
                    segments: &request.segments,
                    query: &query,
                    body: request.body.as_ref(),
                })
                .await?
                .into_success()?;
            let page = Page::decode(termination, &response.body)?;
            debug!(
                page = state.page(),
                items = page.meta.item_count,
                total_pages = page.meta.total_pages,
                "fetched page"
            );

            state = state.advance(termination, &page.meta);
            items.extend(page.items);
        }

        Ok(ResultSequence::Aggregated(items))
    }

    /// Exact `page` / `limit` arguments move the start page and page size.
    fn paging_overrides(&self, request: &ComposedRequest) -> Result<(u32, NonZeroU32), CliError> {
        let first_page = match request.query_value(PAGE_PARAM) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| CliError::invalid_input(format!("--page must be a positive integer, got `{raw}`")))?,
            None => FIRST_PAGE,
        };
        let page_size = match request.query_value(LIMIT_PARAM) {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .ok()
                .filter(|limit| limit.get() <= MAX_PAGE_SIZE)
                .ok_or_else(|| {
                    CliError::invalid_input(format!(
                        "--limit must be between 1 and {MAX_PAGE_SIZE}, got `{raw}`"
                    ))
                })?,
            None => self.page_size,
        };
        Ok((first_page, page_size))
    }
}

/// Decode a single-call response; empty bodies become a status record.
fn single_value(response: &HttpResponse) -> Value {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return json!({"status": response.status, "title": "No Content"});
    }
    serde_json::from_slice(&response.body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).into_owned()))
}
