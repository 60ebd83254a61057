use crate::{
    error::{AppError, AppResult},
    utils::{
        cookie::{extract_cookie, SESSION_COOKIE},
        token::decode_session_token,
    },
};
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

/// Which table an account lives in, and which routes it may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Volunteer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Volunteer => "volunteer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "volunteer" => Some(Role::Volunteer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Login route a client should be sent to when this role is missing.
    pub fn login_path(&self) -> &'static str {
        match self {
            Role::User => "/user_login",
            Role::Volunteer => "/volunteer_login",
            Role::Admin => "/admin_login",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub role: Role,
    pub id: i32,
}

/// Per-request session context, threaded through handlers instead of any
/// ambient state. Carries at most one role tag and the matching row id.
#[derive(Debug, Clone, Default)]
pub struct Session(Option<SessionClaims>);

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let claims = extract_cookie(headers, SESSION_COOKIE)
            .and_then(|token| decode_session_token(&token).ok())
            .and_then(|claims| {
                let role = Role::parse(&claims.role)?;
                let id = claims.sub.parse().ok()?;
                Some(SessionClaims { role, id })
            });
        Session(claims)
    }

    pub fn user_id(&self) -> AppResult<i32> {
        self.require(Role::User)
    }

    pub fn volunteer_id(&self) -> AppResult<i32> {
        self.require(Role::Volunteer)
    }

    pub fn admin_id(&self) -> AppResult<i32> {
        self.require(Role::Admin)
    }

    fn require(&self, role: Role) -> AppResult<i32> {
        match &self.0 {
            Some(claims) if claims.role == role => Ok(claims.id),
            _ => Err(AppError::RoleRequired(role)),
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{cookie::build_session_cookie, token::encode_session_token};
    use axum::http::{header, HeaderValue};
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn ensure_config() {
        INIT.call_once(|| {
            std::env::set_var(
                "SESSION_SECRET",
                "a_very_long_secret_key_that_is_at_least_32_chars",
            );
            let config = crate::config::session::SessionConfig::from_env().unwrap();
            let _ = crate::utils::token::init_session_config(config);
        });
    }

    fn headers_with_session(role: &str, id: i32) -> HeaderMap {
        let token = encode_session_token(id, role).unwrap();
        let cookie = build_session_cookie(&token, 3600);
        // Only the name=value pair travels back on requests.
        let pair = cookie.split(';').next().unwrap().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        headers
    }

    #[test]
    fn session_resolves_matching_role() {
        ensure_config();
        let session = Session::from_headers(&headers_with_session("user", 7));
        assert_eq!(session.user_id().unwrap(), 7);
    }

    #[test]
    fn wrong_role_is_rejected_with_login_path() {
        ensure_config();
        let session = Session::from_headers(&headers_with_session("volunteer", 3));
        let err = session.admin_id().unwrap_err();
        match err {
            AppError::RoleRequired(role) => assert_eq!(role.login_path(), "/admin_login"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_cookie_yields_empty_session() {
        ensure_config();
        let session = Session::from_headers(&HeaderMap::new());
        assert!(session.user_id().is_err());
        assert!(session.volunteer_id().is_err());
        assert!(session.admin_id().is_err());
    }

    #[test]
    fn garbage_token_yields_empty_session() {
        ensure_config();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=not-a-token"),
        );
        let session = Session::from_headers(&headers);
        assert!(session.user_id().is_err());
    }

    #[test]
    fn role_string_round_trip() {
        for role in [Role::User, Role::Volunteer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("citizen"), None);
    }
}
