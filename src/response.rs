//! Response values returned by controller methods.
//!
//! The dispatcher passes a [`Response`] through untouched; writing the status
//! line, headers and cookies to the wire is the caller's job.

use crate::request::HeaderVec;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const HTTP_CODE_OK: u16 = 200;
pub const HTTP_CODE_MOVED_PERMANENTLY: u16 = 301;
pub const HTTP_CODE_FOUND: u16 = 302;
pub const HTTP_CODE_BAD_REQUEST: u16 = 400;
pub const HTTP_CODE_NOT_FOUND: u16 = 404;
pub const HTTP_CODE_INTERNAL_ERROR: u16 = 500;

/// Response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Body {
    Empty,
    Json(Value),
    Html(String),
    Text(String),
}

/// A cookie to set, or to remove when `value` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: Option<String>,
    /// Lifetime in seconds from now
    pub max_age: i64,
    pub path: String,
    /// Empty means the request host
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, max_age: i64) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            max_age,
            path: "/".to_owned(),
            domain: String::new(),
            secure: true,
            http_only: true,
        }
    }
}

/// Status, headers, cookies and body produced by a controller.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub cookies: Vec<Cookie>,
    pub body: Body,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, body: Body) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            cookies: Vec::new(),
            body,
        }
    }

    /// JSON envelope `{"$ret": 1, "$msg": "", "data": ...}`.
    #[must_use]
    pub fn json(data: impl Serialize) -> Self {
        Self::json_envelope(true, "", data)
    }

    /// JSON envelope with `$ret: 0` and an error message.
    #[must_use]
    pub fn json_error(message: &str) -> Self {
        Self::json_envelope(false, message, Value::Null)
    }

    fn json_envelope(success: bool, message: &str, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).unwrap_or(Value::Null);
        let body = json!({
            "$ret": i32::from(success),
            "$msg": message,
            "data": data,
        });
        let mut response = Self::new(HTTP_CODE_OK, Body::Json(body));
        response.add_header("Content-Type", "application/json; charset=utf-8");
        response
    }

    #[must_use]
    pub fn html(html: impl Into<String>) -> Self {
        let mut response = Self::new(HTTP_CODE_OK, Body::Html(html.into()));
        response.add_header("Content-Type", "text/html; charset=utf-8");
        response
    }

    /// Raw text passed through as-is.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(HTTP_CODE_OK, Body::Text(text.into()))
    }

    #[must_use]
    pub fn redirect(location: &str, status: u16) -> Self {
        let mut response = Self::new(status, Body::Empty);
        response.add_header("Location", location);
        response
    }

    /// Empty 4xx response carrying only the status.
    #[must_use]
    pub fn error(status: u16) -> Self {
        Self::new(status, Body::Empty)
    }

    /// Add or replace a header (case-insensitive name).
    pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Schedule a cookie; a later cookie with the same name replaces it.
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.retain(|c| c.name != cookie.name);
        self.cookies.push(cookie);
    }

    /// Schedule removal of a cookie.
    pub fn remove_cookie(&mut self, name: &str) {
        self.add_cookie(Cookie {
            value: None,
            max_age: -3600,
            ..Cookie::new(name, "", 0)
        });
    }
}
