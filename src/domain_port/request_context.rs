use crate::domain_model::TOKEN_KEY;
use std::collections::HashMap;

/// Query parameters and cookies of the request being served.
pub trait RequestContext: Send + Sync {
    fn query(&self, name: &str) -> Option<&str>;
    fn cookie(&self, name: &str) -> Option<&str>;
}

/// Token from the `Token` query parameter, falling back to the `Token` cookie.
/// An empty string means no token.
pub fn extract_token(ctx: &dyn RequestContext) -> String {
    if let Some(token) = ctx.query(TOKEN_KEY).filter(|t| !t.is_empty()) {
        return token.to_string();
    }
    ctx.cookie(TOKEN_KEY).unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct HttpRequestContext {
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

impl HttpRequestContext {
    pub fn new(query: HashMap<String, String>, cookies: HashMap<String, String>) -> Self {
        Self { query, cookies }
    }

    /// Builds a context from decoded query pairs and the raw `Cookie` header.
    pub fn from_parts(query: HashMap<String, String>, cookie_header: Option<&str>) -> Self {
        let cookies = cookie_header.map(parse_cookie_header).unwrap_or_default();
        Self { query, cookies }
    }
}

impl RequestContext for HttpRequestContext {
    fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

// First occurrence of a name wins.
fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';') {
        if let Some((name, value)) = pair.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            cookies
                .entry(name.trim().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    cookies
}
