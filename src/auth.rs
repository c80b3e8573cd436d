use crate::errors::AppError;
use crate::models::Session;
use crate::state::AppState;
use axum::http::{HeaderMap, header};

/// Pulls the backend access token from `Authorization: Bearer` or the session cookie.
pub fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolves the caller's identity. `None` when there is no token or the
/// backend rejects it.
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Session>, AppError> {
    let Some(access_token) = access_token(headers, &state.session_cookie) else {
        return Ok(None);
    };

    let user = state.store.current_user(&access_token).await?;
    Ok(user.map(|user| Session { access_token, user }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=xyz"));
        assert_eq!(access_token(&headers, "sb-access-token").as_deref(), Some("abc"));
    }

    #[test]
    fn token_is_read_from_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=xyz; other=1"),
        );
        assert_eq!(access_token(&headers, "sb-access-token").as_deref(), Some("xyz"));
        assert_eq!(access_token(&headers, "missing"), None);
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token="));
        assert_eq!(access_token(&headers, "sb-access-token"), None);
    }
}
