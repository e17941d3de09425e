use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};
use tracing::{debug, warn};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_config::AppConfig;

use crate::jwt::validate_token;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

// Middleware for routes that require a signed-in user
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let user = validate_token(token, &config.supabase_jwt_secret)
        .map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// Middleware for admin routes. Validates the bearer token itself so the
// guard is self-contained: no token is 401, a token whose email does not
// match the configured admin address is 403.
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let user = validate_token(token, &config.supabase_jwt_secret)
        .map_err(AppError::Auth)?;

    // An empty allow-list admits no one.
    let is_admin = !config.admin_email.is_empty()
        && user.email.as_deref() == Some(config.admin_email.as_str());

    if !is_admin {
        warn!("Admin route rejected for user: {}", user.id);
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Resolve the caller's identity when a usable bearer token is present.
/// Anonymous and unverifiable callers get `None` rather than an error;
/// routes that tolerate anonymous use decide what to do with that.
pub fn maybe_user(headers: &HeaderMap, config: &AppConfig) -> Option<User> {
    let token = bearer_token(headers).ok()?;

    match validate_token(token, &config.supabase_jwt_secret) {
        Ok(user) => Some(user),
        Err(e) => {
            debug!("Ignoring unusable bearer token: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestConfig, TestUser};
    use axum::http::HeaderValue;

    fn headers_with_bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn maybe_user_resolves_valid_token() {
        let test_config = TestConfig::default();
        let config = test_config.to_app_config();
        let test_user = TestUser::patient("patient@example.com");
        let token = JwtTestUtils::create_test_token(&test_user, &test_config.jwt_secret, Some(1));

        let user = maybe_user(&headers_with_bearer(&token), &config);
        assert_eq!(user.map(|u| u.id), Some(test_user.id));
    }

    #[test]
    fn maybe_user_is_none_without_header() {
        let config = TestConfig::default().to_app_config();
        assert!(maybe_user(&HeaderMap::new(), &config).is_none());
    }

    #[test]
    fn maybe_user_is_none_for_garbage_token() {
        let config = TestConfig::default().to_app_config();
        let headers = headers_with_bearer("not.a.jwt");
        assert!(maybe_user(&headers, &config).is_none());
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());
    }
}
