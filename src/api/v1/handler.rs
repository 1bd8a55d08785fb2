use super::error::*;
use crate::application_port::AuthProvider;
use crate::domain_model::{LoginRequest, TOKEN_KEY};
use crate::domain_port::HttpRequestContext;
use serde::Serialize;
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn token_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", TOKEN_KEY, token)
}

fn expired_token_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", TOKEN_KEY)
}

pub async fn check_login(
    ctx: HttpRequestContext,
    bearer_token: Option<String>,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let logged_in = auth_provider
        .check_login(&ctx, bearer_token.as_deref(), "")
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(logged_in)))
}

pub async fn current_user(
    ctx: HttpRequestContext,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let controls = auth_provider
        .current_user(&ctx, "")
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(controls)))
}

pub async fn user_name(
    ctx: HttpRequestContext,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let name = auth_provider
        .user_name(&ctx, "")
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(name)))
}

pub async fn login(
    body: LoginRequest,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_result = auth_provider
        .try_login(&body.app_key, &body.account, &body.password)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let cookie = token_cookie(&login_result.token);
    Ok(warp::reply::with_header(
        warp::reply::json(&ApiResponse::ok(login_result)),
        "set-cookie",
        cookie,
    ))
}

pub async fn logout(
    ctx: HttpRequestContext,
    auth_provider: Arc<dyn AuthProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let logged_out = auth_provider.logout(&ctx).await;

    Ok(warp::reply::with_header(
        warp::reply::json(&ApiResponse::ok(logged_out)),
        "set-cookie",
        expired_token_cookie(),
    ))
}
