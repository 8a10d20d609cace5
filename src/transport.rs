use std::time::Duration;

use async_trait::async_trait;
use bctoolkit_catalog::HttpMethod;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::{CliError, TransportError};
use crate::payload::RequestBody;

const AUTH_HEADER: &str = "X-Auth-Token";

/// One HTTP call as seen by the transport.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingRequest<'a> {
    pub method: HttpMethod,
    pub segments: &'a [String],
    pub query: &'a [(String, String)],
    pub body: Option<&'a RequestBody>,
}

/// Raw response; status interpretation is left to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Non-2xx responses become `ApiError` with the body untouched.
    pub fn into_success(self) -> Result<Self, CliError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CliError::Api {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutgoingRequest<'_>) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport bound to one store.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    store_root: Url,
    token: String,
}

impl HttpTransport {
    pub fn new(api: &ApiSettings) -> Result<Self, CliError> {
        let store_hash = api.store_hash.clone().ok_or(CliError::MissingStoreHash)?;
        let token = api.auth_token.clone().ok_or(CliError::MissingAuthToken)?;
        Self::with_parts(&api.base_url, &store_hash, token, api.timeout)
    }

    pub fn with_parts(
        base_url: &Url,
        store_hash: &str,
        token: String,
        timeout: Duration,
    ) -> Result<Self, CliError> {
        let mut store_root = base_url.clone();
        store_root
            .path_segments_mut()
            .map_err(|()| CliError::invalid_input(format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .extend(["stores", store_hash, ""]);

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self {
            client,
            store_root,
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("bctoolkit/", env!("CARGO_PKG_VERSION"))
    }

    pub fn auth_header(&self) -> Result<HeaderValue, TransportError> {
        let mut value =
            HeaderValue::from_str(&self.token).map_err(|e| TransportError::Header(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Store-relative URL with each segment percent-encoded.
    pub fn url(&self, segments: &[String], query: &[(String, String)]) -> Url {
        let mut url = self.store_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutgoingRequest<'_>) -> Result<HttpResponse, TransportError> {
        let url = self.url(request.segments, request.query);
        debug!(method = %request.method, %url, "sending request");

        let mut req = self
            .client
            .request(to_method(request.method), url)
            .header(AUTH_HEADER, self.auth_header()?)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        match request.body {
            Some(RequestBody::Json { value }) => req = req.json(value),
            Some(RequestBody::Multipart {
                fields,
                file_field,
                file_path,
            }) => {
                let bytes = tokio::fs::read(file_path)
                    .await
                    .map_err(|source| TransportError::Attachment {
                        path: file_path.display().to_string(),
                        source,
                    })?;
                let file_name = file_path
                    .file_name()
                    .map_or_else(|| file_field.clone(), |n| n.to_string_lossy().into_owned());
                let mut form = Form::new().part(file_field.clone(), Part::bytes(bytes).file_name(file_name));
                for (name, value) in fields {
                    form = form.text(name.clone(), value.clone());
                }
                req = req.multipart(form);
            }
            None => {}
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}
