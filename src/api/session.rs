//! Session cookie handling

use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Session id carried by the cookie, or a fresh one with the cookie set on `jar`.
///
/// Only ids this server could have issued are accepted; anything else starts
/// a new session.
pub fn session_id(jar: CookieJar, config: &SessionConfig) -> (CookieJar, String) {
    let existing = jar
        .get(&config.cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    match existing {
        Some(id) => (jar, id.simple().to_string()),
        None => {
            let id = Uuid::new_v4().simple().to_string();
            let cookie = Cookie::build((config.cookie_name.clone(), id.clone()))
                .http_only(true)
                .path("/");
            (jar.add(cookie), id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cookie_starts_a_session() {
        let config = SessionConfig::default();
        let (jar, id) = session_id(CookieJar::new(), &config);

        let cookie = jar.get("sessionid").unwrap();
        assert_eq!(cookie.value(), id);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_existing_cookie_is_kept() {
        let config = SessionConfig::default();
        let id = Uuid::new_v4().simple().to_string();
        let jar = CookieJar::new().add(Cookie::new("sessionid", id.clone()));

        let (_, resolved) = session_id(jar, &config);
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_malformed_cookie_is_replaced() {
        let config = SessionConfig::default();
        let jar = CookieJar::new().add(Cookie::new("sessionid", "../../etc/passwd"));

        let (jar, id) = session_id(jar, &config);
        assert_ne!(id, "../../etc/passwd");
        assert_eq!(jar.get("sessionid").unwrap().value(), id);
    }
}
