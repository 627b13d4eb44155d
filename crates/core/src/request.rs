//! Transport-agnostic request descriptors.
//!
//! The workspace never performs IO. Builders in the service crates return an
//! [`ApiRequest`] which the host application executes with its own HTTP client
//! and feeds the response body back into the parsers.

use serde::Serialize;
use serde_json::Value;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully described API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, with `:params` already substituted.
    pub path: String,
    /// Query flags, in insertion order.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Substitute the `:key` path segment with `value`.
    pub fn param(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.path = replace_uri_params(&self.path, &[(key, value.as_ref())]);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Value of the `Authorization` header, if the request is authenticated.
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Absolute URL against `base_url`, including query flags.
    ///
    /// Query values are flags produced by the builders (`true`, `false`) and
    /// are not percent-encoded.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        for (i, (key, value)) in self.query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

/// Replace `:key` path segments with their values.
///
/// Matching is per segment, so `:id` never clobbers part of `:identityId`.
pub fn replace_uri_params(template: &str, params: &[(&str, &str)]) -> String {
    template
        .split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.iter().find(|(k, _)| *k == name))
                .map_or(segment, |(_, v)| *v)
        })
        .collect::<Vec<_>>()
        .join("/")
}
