use super::handler;
use crate::domain_port::HttpRequestContext;
use crate::server::*;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::{Filter, http};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let check_login = warp::path("check_login")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_request_context())
        .and(with_bearer_token())
        .and(with(server.auth_provider.clone()))
        .and_then(handler::check_login);

    let current_user = warp::path("current_user")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_request_context())
        .and(with(server.auth_provider.clone()))
        .and_then(handler::current_user);

    let user_name = warp::path("user_name")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_request_context())
        .and(with(server.auth_provider.clone()))
        .and_then(handler::user_name);

    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(server.auth_provider.clone()))
        .and_then(handler::login);

    let logout = warp::path("logout")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_request_context())
        .and(with(server.auth_provider.clone()))
        .and_then(handler::logout);

    check_login
        .or(current_user)
        .or(user_name)
        .or(login)
        .or(logout)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Query parameters and cookies of the current request. Never rejects: an
/// undecodable query string or header reads as absent.
fn with_request_context()
-> impl Filter<Extract = (HttpRequestContext,), Error = Infallible> + Clone {
    warp::query::<HashMap<String, String>>()
        .or(warp::any().map(HashMap::<String, String>::new))
        .unify()
        .and(warp::header::headers_cloned())
        .map(|query: HashMap<String, String>, headers: HeaderMap| {
            HttpRequestContext::from_parts(query, cookie_header(&headers).as_deref())
        })
}

/// Token of an `Authorization: Bearer <token>` header, if any.
fn with_bearer_token() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::header::headers_cloned().map(|headers: HeaderMap| bearer_token(&headers))
}

// Cookie values are read as bytes; browsers may send non-ASCII cookies that
// `HeaderValue::to_str` refuses.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(http::header::COOKIE)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(http::header::AUTHORIZATION)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let (scheme, token) = value.trim().split_once(char::is_whitespace)?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::recover_error;
    use crate::application_impl::*;
    use crate::application_port::AuthProvider;
    use crate::domain_port::{CacheError, CacheStore, Clock, SystemClock};
    use crate::infra_memory::MemoryCacheStore;
    use chrono::{DateTime, TimeDelta, Utc};
    use serde_json::{Value, json};
    use warp::http::StatusCode;

    /// Cache whose backend is down.
    struct UnreachableCache;

    #[async_trait::async_trait]
    impl CacheStore for UnreachableCache {
        async fn get_raw(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Store("connection refused".to_string()))
        }

        async fn set_raw(
            &self,
            _key: &str,
            _value: Vec<u8>,
            _expire_at: DateTime<Utc>,
        ) -> Result<(), CacheError> {
            Err(CacheError::Store("connection refused".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Store("connection refused".to_string()))
        }
    }

    fn api() -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        api_over(Arc::new(MemoryCacheStore::new(clock)))
    }

    fn api_over(
        cache: Arc<dyn CacheStore>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let login_parser = Arc::new(FakeLoginParser::new(
            cache.clone(),
            clock.clone(),
            TimeDelta::hours(1),
            "/home",
        ));
        let provider: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(
            cache,
            login_parser,
            Arc::new(FakeControlResolver::new()),
            clock,
            SessionOptions::default(),
        ));
        let server = Arc::new(Server::with_provider(provider));

        warp::path("api")
            .and(warp::path("v1"))
            .and(routes(server))
            .recover(recover_error)
    }

    fn body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn login_request(password: &str) -> warp::test::RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/api/v1/login")
            .json(&json!({ "app_key": "app1", "account": "bob", "password": password }))
    }

    #[tokio::test]
    async fn login_sets_cookie_and_session_is_visible() {
        let api = api();
        let resp = login_request("123456").reply(&api).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
        let data = body(resp.body());
        assert_eq!(data["success"], true);
        assert_eq!(data["data"]["return_url"], "/home");
        let token = data["data"]["token"].as_str().unwrap().to_string();
        assert!(cookie.starts_with(&format!("Token={};", token)));

        let resp = warp::test::request()
            .path("/api/v1/user_name")
            .header("cookie", format!("Token={}", token))
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], "bob");

        let resp = warp::test::request()
            .path(&format!("/api/v1/current_user?Token={}", token))
            .reply(&api)
            .await;
        let data = body(resp.body());
        assert_eq!(data["data"]["account"], "bob");
        assert_eq!(data["data"]["modules"][0]["code"], "Home");

        let resp = warp::test::request()
            .path("/api/v1/check_login")
            .header("authorization", format!("Bearer {}", token))
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], true);
    }

    #[tokio::test]
    async fn anonymous_requests_get_empty_answers() {
        let api = api();
        let resp = warp::test::request()
            .path("/api/v1/check_login")
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], false);

        let resp = warp::test::request()
            .path("/api/v1/user_name")
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], "");

        let resp = warp::test::request()
            .path("/api/v1/current_user")
            .reply(&api)
            .await;
        let data = body(resp.body());
        assert_eq!(data["success"], true);
        assert_eq!(data["data"]["account"], "");
    }

    #[tokio::test]
    async fn login_failures_map_to_error_codes() {
        let api = api();
        let resp = login_request("wrong").reply(&api).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let data = body(resp.body());
        assert_eq!(data["success"], false);
        assert_eq!(data["error"]["code"], "InvalidCredentials");

        let resp = login_request("000000").reply(&api).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(resp.body())["error"]["code"], "InternalError");

        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/login")
            .body("{not json")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp.body())["error"]["code"], "InvalidInput");
    }

    #[tokio::test]
    async fn logout_ends_session_and_clears_cookie() {
        let api = api();
        let resp = login_request("123456").reply(&api).await;
        let token = body(resp.body())["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();
        let cookie = format!("Token={}", token);

        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/logout")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], true);
        let cleared = resp.headers()["set-cookie"].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));

        let resp = warp::test::request()
            .path("/api/v1/check_login")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], false);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let api = api();
        let resp = warp::test::request()
            .path("/api/v1/nope")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(resp.body())["error"]["code"], "NotFound");
    }

    #[tokio::test]
    async fn non_ascii_cookies_do_not_break_token_lookup() {
        let api = api();
        let resp = login_request("123456").reply(&api).await;
        let token = body(resp.body())["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();
        let cookie = format!("Token={}; name=café", token);

        let resp = warp::test::request()
            .path("/api/v1/check_login")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp.body())["data"], true);

        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/logout")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp.body())["data"], true);

        let resp = warp::test::request()
            .path("/api/v1/check_login")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(body(resp.body())["data"], false);
    }

    #[tokio::test]
    async fn bearer_scheme_is_case_insensitive_and_trimmed() {
        let api = api();
        let resp = login_request("123456").reply(&api).await;
        let token = body(resp.body())["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        for header in [
            format!("Bearer {}", token),
            format!("bearer {}", token),
            format!("BEARER   {}  ", token),
        ] {
            let resp = warp::test::request()
                .path("/api/v1/check_login")
                .header("authorization", header.as_str())
                .reply(&api)
                .await;
            assert_eq!(body(resp.body())["data"], true, "header {:?}", header);
        }
    }

    #[test]
    fn bearer_token_parsing() {
        let parse = |value: &str| {
            let mut headers = HeaderMap::new();
            headers.insert(http::header::AUTHORIZATION, value.parse().unwrap());
            bearer_token(&headers)
        };
        assert_eq!(parse("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(parse("bearer\tabc ").as_deref(), Some("abc"));
        assert_eq!(parse("Bearer "), None);
        assert_eq!(parse("Basic abc"), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn store_outage_is_service_unavailable() {
        let api = api_over(Arc::new(UnreachableCache));

        let resp = warp::test::request()
            .path("/api/v1/check_login?Token=abc")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body(resp.body())["error"]["code"], "ServiceUnavailable");

        let resp = login_request("123456").reply(&api).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/logout?Token=abc")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp.body())["data"], false);
    }
}
