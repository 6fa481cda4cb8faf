//! Explicit request context.
//!
//! Everything a controller may want to know about the incoming request is
//! carried in a [`RequestContext`] built by the caller and handed to the
//! dispatcher. Nothing is read from the process environment.

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers/cookies before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated name/value storage for headers, cookies and parameters.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Header set by browsers' XMLHttpRequest wrappers.
pub const HEADER_REQUESTED_WITH: &str = "x-requested-with";

/// Request method, headers, parameters and cookies of one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    https: bool,
    remote_addr: Option<String>,
    headers: HeaderVec,
    query: HeaderVec,
    form: HeaderVec,
    cookies: HeaderVec,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            https: false,
            remote_addr: None,
            headers: HeaderVec::new(),
            query: HeaderVec::new(),
            form: HeaderVec::new(),
            cookies: HeaderVec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query.extend(parse_pairs(query));
        self
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.form.extend(parse_pairs(body));
        self
    }

    /// Parse a `Cookie` header value.
    #[must_use]
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        for pair in header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                self.cookies.push((Arc::from(name.trim()), value.trim().to_owned()));
            }
        }
        self
    }

    #[must_use]
    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// Whether the request carries the `X-Requested-With: XMLHttpRequest`
    /// marker (case-insensitive).
    #[must_use]
    pub fn is_ajax(&self) -> bool {
        self.header(HEADER_REQUESTED_WITH)
            .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
    }

    /// Header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `Accept` header mentions `mime`.
    #[must_use]
    pub fn accepts(&self, mime: &str) -> bool {
        self.header("accept").is_some_and(|v| v.contains(mime))
    }

    /// Query parameter, or `default` when absent. Last occurrence wins.
    #[must_use]
    pub fn get<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        lookup(&self.query, name).unwrap_or(default)
    }

    /// Query parameter as an integer; absent, empty or unparsable values
    /// give `default`.
    #[must_use]
    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        parse_int(lookup(&self.query, name), default)
    }

    /// Form parameter, or `default` when absent.
    #[must_use]
    pub fn post<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        lookup(&self.form, name).unwrap_or(default)
    }

    #[must_use]
    pub fn post_int(&self, name: &str, default: i64) -> i64 {
        parse_int(lookup(&self.form, name), default)
    }

    /// Query parameter, falling back to the form parameter.
    #[must_use]
    pub fn get_var<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        lookup(&self.query, name)
            .or_else(|| lookup(&self.form, name))
            .unwrap_or(default)
    }

    #[must_use]
    pub fn get_var_int(&self, name: &str, default: i64) -> i64 {
        parse_int(
            lookup(&self.query, name).or_else(|| lookup(&self.form, name)),
            default,
        )
    }

    /// All values of a repeated query parameter (`tag=a&tag=b`).
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[must_use]
    pub fn cookie<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map_or(default, |(_, v)| v.as_str())
    }

    #[must_use]
    pub fn cookies(&self) -> &HeaderVec {
        &self.cookies
    }

    /// `https` or `http`.
    #[must_use]
    pub fn protocol(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    #[must_use]
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Absolute URL for `path` on `host`.
    #[must_use]
    pub fn absolute_url(&self, host: &str, path: &str) -> String {
        format!("{}://{host}{path}", self.protocol())
    }
}

fn parse_pairs(input: &str) -> impl Iterator<Item = (Arc<str>, String)> + '_ {
    url::form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
}

fn lookup<'a>(pairs: &'a HeaderVec, name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

fn parse_int(value: Option<&str>, default: i64) -> i64 {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().parse().unwrap_or(default),
        _ => default,
    }
}
