//! Cookie service for the httpOnly refresh token cookie.
//!
//! The refresh token never travels in a response body. It lives in a
//! path-scoped cookie that only the auth endpoints ever receive.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "orgdoc_refresh";

/// Path the refresh cookie is scoped to.
const REFRESH_COOKIE_PATH: &str = "/api/auth";

/// Build a httpOnly cookie carrying the refresh token.
pub fn refresh_cookie(token: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH.to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Build an expired cookie to clear the refresh token.
pub fn clear_refresh_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH.to_string())
        .max_age(Duration::ZERO)
        .build()
}
