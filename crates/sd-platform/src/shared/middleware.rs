//! API Middleware
//!
//! Authentication and authorization middleware for Axum.
//! Supports both Bearer token (Authorization header) and session cookie authentication.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, header::COOKIE, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::shared::api_common::ApiError;
use crate::shared::authorization_service::{AuthContext, AuthorizationService};

/// Default session cookie name
const SESSION_COOKIE_NAME: &str = "sd_session";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub authz_service: Arc<AuthorizationService>,
}

/// Authenticated user extractor
/// Validates JWT and extracts AuthContext from the request
pub struct Authenticated(pub AuthContext);

impl std::ops::Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Error response for authentication failures
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiError {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
            details: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Extract token from session cookie
fn extract_session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(|c| c.trim())
                .find_map(|c| {
                    // Exact name match; "sd_session_other" must not qualify
                    c.strip_prefix(SESSION_COOKIE_NAME)
                        .and_then(|rest| rest.strip_prefix('='))
                })
                .map(|v| v.to_string())
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get AppState from extensions (set by middleware layer)
        let app_state = parts.extensions.get::<AppState>().ok_or_else(|| AuthError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Auth service not configured".to_string(),
        })?;

        // Try to extract token from Authorization header first, then from session cookie
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .and_then(crate::auth::auth_service::extract_bearer_token)
            .map(String::from)
            .or_else(|| extract_session_cookie(parts))
            .ok_or_else(|| AuthError {
                status: StatusCode::UNAUTHORIZED,
                message: "Missing authentication token".to_string(),
            })?;

        // Validate token
        let claims = app_state
            .auth_service
            .validate_token(&token)
            .map_err(|e| AuthError {
                status: StatusCode::UNAUTHORIZED,
                message: e.to_string(),
            })?;

        // Build auth context with resolved permissions
        let context = app_state
            .authz_service
            .build_context(&claims)
            .await
            .map_err(|e| AuthError {
                status: StatusCode::UNAUTHORIZED,
                message: e.to_string(),
            })?;

        Ok(Authenticated(context))
    }
}

/// Middleware layer that injects AppState into request extensions
/// This enables the Authenticated extractor to work
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::Layer;
use tower::Service;

#[derive(Clone)]
pub struct AuthLayer {
    state: AppState,
}

impl AuthLayer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AppState,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        // Insert AppState into request extensions
        req.extensions_mut().insert(self.state.clone());

        let future = self.inner.call(req);
        Box::pin(async move { future.await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(COOKIE, cookie)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_extract_session_cookie() {
        let parts = parts_with_cookie("theme=dark; sd_session=tok123; lang=en");
        assert_eq!(extract_session_cookie(&parts), Some("tok123".to_string()));
    }

    #[test]
    fn test_extract_session_cookie_missing() {
        let parts = parts_with_cookie("theme=dark");
        assert_eq!(extract_session_cookie(&parts), None);
    }

    #[test]
    fn test_extract_session_cookie_ignores_prefixed_names() {
        let parts = parts_with_cookie("sd_session_other=evil; sd_session=tok123");
        assert_eq!(extract_session_cookie(&parts), Some("tok123".to_string()));

        let parts = parts_with_cookie("sd_session_other=evil");
        assert_eq!(extract_session_cookie(&parts), None);
    }
}
