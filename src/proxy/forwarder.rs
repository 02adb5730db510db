//! Generic platform forwarder
//!
//! Relays a browser request to the EduSP platform API and the platform's
//! answer back to the browser. The platform does not always answer in JSON
//! (error pages in particular), so the response body is relayed as JSON only
//! when the upstream says it is JSON.

use axum::{
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use reqwest::{header::HeaderValue, Url};
use serde_json::Value;
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::{sanitize_request_headers, select_response_headers, upstream_authority},
        logging::RequestContext,
    },
};

/// One inbound request, described in upstream terms
#[derive(Debug, Clone)]
pub struct ForwardSpec {
    pub method: Method,
    /// Unencoded path segments, e.g. `["tms", "task", "42", "apply"]`
    pub segments: Vec<String>,
    /// Raw inbound query string, relayed byte-for-byte
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ForwardSpec {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Upstream path as logged and reported in errors
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    fn sends_body(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

/// Parse an inbound body as JSON; an empty body is no body
pub fn parse_json_body(bytes: &Bytes) -> AppResult<Option<Value>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Upstream body, relayed as received
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Json(Value),
    Text(String),
}

/// Upstream answer ready to be written back to the client
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ReplyBody,
}

impl UpstreamReply {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(value) => (self.status, self.headers, Json(value)).into_response(),
            ReplyBody::Text(text) => (self.status, self.headers, text).into_response(),
        }
    }
}

/// Forwarder bound to the EduSP platform API
pub struct EduspForwarder {
    client: reqwest::Client,
    base_url: Url,
    host: HeaderValue,
}

impl EduspForwarder {
    /// Create a new forwarder
    pub fn new(client: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.edusp_api_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("EDUSP_API_URL is not a base URL: {}", config.edusp_api_url);
        }
        let host = upstream_authority(&base_url)
            .ok_or_else(|| anyhow::anyhow!("EDUSP_API_URL has no host: {}", config.edusp_api_url))?;

        Ok(Self {
            client,
            base_url,
            host,
        })
    }

    /// Upstream URL for a spec, query included
    pub fn upstream_url(&self, spec: &ForwardSpec) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&spec.segments);
        }
        url.set_query(spec.query.as_deref());
        url
    }

    /// Forward a request and relay the platform's answer
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path()))]
    pub async fn forward(&self, spec: ForwardSpec) -> AppResult<UpstreamReply> {
        let endpoint = spec.path();
        let ctx = RequestContext::new("edusp", &endpoint).with_method(spec.method.as_str());
        ctx.log_request_start();

        let url = self.upstream_url(&spec);
        let mut headers = sanitize_request_headers(&spec.headers, &self.host);

        let mut request = self
            .client
            .request(spec.method.clone(), url.clone());

        let mut body_size = None;
        if spec.sends_body() {
            if let Some(body) = &spec.body {
                let bytes = serde_json::to_vec(body).map_err(|e| AppError::upstream(&endpoint, e))?;
                if !headers.contains_key(header::CONTENT_TYPE) {
                    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                body_size = Some(bytes.len());
                request = request.body(bytes);
            }
        }

        ctx.log_upstream_request(url.as_str(), body_size);

        let response = request.headers(headers).send().await.map_err(|e| {
            ctx.log_transport_error(&e);
            AppError::upstream(&endpoint, e)
        })?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        let headers = select_response_headers(response.headers());
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let bytes = response.bytes().await.map_err(|e| {
            ctx.log_transport_error(&e);
            AppError::upstream(&endpoint, e)
        })?;

        let body = if is_json && !bytes.is_empty() {
            match serde_json::from_slice(&bytes) {
                Ok(value) => ReplyBody::Json(value),
                Err(e) => {
                    ctx.log_error(&format!("invalid JSON from upstream: {}", e));
                    return Err(AppError::upstream(&endpoint, e));
                }
            }
        } else {
            ReplyBody::Text(String::from_utf8_lossy(&bytes).into_owned())
        };

        Ok(UpstreamReply {
            status,
            headers,
            body,
        })
    }
}
