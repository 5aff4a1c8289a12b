use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use uuid::Uuid;

use crate::config::Environment;

pub const SESSION_COOKIE: &str = "quiz_session";

/// Create the encrypted session cookie holding `token`.
///
/// Secure (HTTPS-only) outside development.
pub fn create_session_cookie(
    token: Uuid,
    environment: &Environment,
    ttl: chrono::Duration,
) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!environment.is_development())
        .build()
}

/// Session token from the cookie jar, if present and well formed
pub fn session_token(jar: &PrivateCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_development() {
        let token = Uuid::new_v4();
        let cookie =
            create_session_cookie(token, &Environment::Development, chrono::Duration::hours(12));

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), token.to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.http_only().unwrap_or(false));
        assert!(
            !cookie.secure().unwrap_or(true),
            "Should not be secure in development"
        );
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(12)));
    }

    #[test]
    fn test_session_cookie_production() {
        let cookie = create_session_cookie(
            Uuid::new_v4(),
            &Environment::Production,
            chrono::Duration::minutes(30),
        );

        assert!(
            cookie.secure().unwrap_or(false),
            "Should be secure in production"
        );
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
