/// Name of both the query parameter and the cookie that carry a session token.
pub const TOKEN_KEY: &str = "Token";

/// Suffix of the cache key holding the authorization view derived from a session.
pub const CONTROLS_KEY_SUFFIX: &str = "_CTRLS";

pub fn controls_key(token: &str) -> String {
    format!("{}{}", token, CONTROLS_KEY_SUFFIX)
}
