use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use anyhow::anyhow;
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

/// Attach a fresh session cookie. Logins always issue a new cookie, which
/// replaces whatever role was previously held: there is no way to carry
/// two roles at once.
pub fn set_session_cookie(response: &mut Response, token: &str) -> AppResult<()> {
    let cookie = crate::utils::cookie::build_session_cookie(
        token,
        crate::utils::token::session_expiry_seconds(),
    );
    append_set_cookie(response, &cookie)
}

pub fn clear_session_cookie(response: &mut Response) -> AppResult<()> {
    append_set_cookie(response, &crate::utils::cookie::build_clear_cookie())
}

fn append_set_cookie(response: &mut Response, cookie_value: &str) -> AppResult<()> {
    let value = HeaderValue::from_str(cookie_value).map_err(|e| {
        AppError::Internal(anyhow!("Failed to build Set-Cookie header value: {}", e))
    })?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = String),
    ),
    tag = "auth"
)]
pub async fn logout() -> AppResult<impl IntoResponse> {
    let mut response = ApiResponse::ok("Logged out").into_response();
    clear_session_cookie(&mut response)?;
    Ok(response)
}
