/*
[INPUT]:  Logical operation parameters (method, path, query, body)
[OUTPUT]: RequestSpec carrying the exact bytes that get signed and sent
[POS]:    HTTP layer - request builder shared by every exchange client
[UPDATE]: When adding body encodings or changing canonical query rendering
*/

use std::collections::BTreeMap;
use std::fmt::Display;

use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use url::form_urlencoded;

use crate::http::{ExchangeError, Result};

/// Encoded request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(String),
    Form(String),
}

impl RequestBody {
    pub fn as_str(&self) -> &str {
        match self {
            RequestBody::Empty => "",
            RequestBody::Json(body) | RequestBody::Form(body) => body,
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }
}

/// A single outbound request, built per call and never reused
///
/// Query parameters are kept sorted by key so the rendered path is
/// canonical; signers sign exactly what [`RequestSpec::path_and_query`]
/// and [`RequestSpec::body_string`] return.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    body: RequestBody,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a query parameter, replacing any previous value
    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// Set a query parameter only when a value is present
    pub fn query_opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set a query parameter only when the string is non-empty
    pub fn query_non_empty(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.query(key, value)
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_string(), value.into());
    }

    /// Serialize `body` as JSON
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Encode `pairs` as an `application/x-www-form-urlencoded` body, sorted by key
    pub fn form_body<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let sorted: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted.iter())
            .finish();
        self.body = RequestBody::Form(encoded);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// URL-encoded query string without the leading `?`
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// Path plus `?query` when there are parameters
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }

    /// The exact body text that will be sent (empty when there is none)
    pub fn body_string(&self) -> &str {
        self.body.as_str()
    }
}

/// Reject empty required string parameters before anything leaves the process
pub fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ExchangeError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Accept only ids that are safe to splice into a URL path as one segment
///
/// Letters, digits, `-` and `_`, at most `max_len` characters.
pub fn require_path_id(field: &'static str, value: &str, max_len: usize) -> Result<()> {
    require_non_empty(field, value)?;
    if value.len() > max_len {
        return Err(ExchangeError::validation(
            field,
            format!("longer than {max_len} characters"),
        ));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ExchangeError::validation(
            field,
            format!("unexpected character {bad:?}"),
        ));
    }
    Ok(())
}

/// Reject zero or negative quantities
pub fn require_positive(field: &'static str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(ExchangeError::validation(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Reject values outside a fixed set of accepted strings
pub fn require_one_of(field: &'static str, value: &str, accepted: &[&str]) -> Result<()> {
    if !accepted.contains(&value) {
        return Err(ExchangeError::validation(
            field,
            format!("`{value}` is not one of {}", accepted.join(",")),
        ));
    }
    Ok(())
}
