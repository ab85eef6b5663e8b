//! Session cookies.
//!
//! Both principal kinds use the same cookie shape: `HttpOnly`,
//! `SameSite=Lax`, path `/`, `Secure` when configured and a `Max-Age` equal
//! to the session TTL.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Builds a session cookie carrying `token`.
pub fn session_cookie(name: &str, token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((name.to_string(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Expires the cookie `name` on the client.
pub fn clear_session_cookie(jar: CookieJar, name: &str) -> CookieJar {
    jar.remove(Cookie::build(name.to_string()).path("/"))
}

/// Non-empty value of cookie `name`.
pub fn session_token<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(Cookie::value).filter(|v| !v.is_empty())
}
