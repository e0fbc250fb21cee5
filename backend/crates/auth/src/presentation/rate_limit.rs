//! Rate Limit Middleware
//!
//! Fixed-window limits on the credential endpoints. Every limited response
//! carries `RateLimit-*` headers; rejected ones also carry `Retry-After` and
//! a `{error, message}` body with a translation key.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::client_key;
use platform::rate_limit::{
    InMemoryRateLimitStore, RateLimitConfig, RateLimitResult, RateLimitStore, now_ms,
};

use crate::error::AuthError;

/// One limiter: its counters are namespaced by `scope`
#[derive(Clone)]
pub struct RouteRateLimit {
    store: Arc<InMemoryRateLimitStore>,
    config: RateLimitConfig,
    scope: &'static str,
    message_key: &'static str,
}

impl RouteRateLimit {
    pub fn new(
        store: Arc<InMemoryRateLimitStore>,
        config: RateLimitConfig,
        scope: &'static str,
        message_key: &'static str,
    ) -> Self {
        Self {
            store,
            config,
            scope,
            message_key,
        }
    }

    /// Count a request for `key`
    ///
    /// `Ok(None)` means the store failed and the request is let through.
    pub async fn check(&self, key: &str) -> Result<Option<RateLimitResult>, Response> {
        let scoped = format!("{}:{}", self.scope, key);
        match self.store.check_and_increment(&scoped, &self.config).await {
            Ok(result) if result.allowed => Ok(Some(result)),
            Ok(result) => {
                let mut response = AuthError::RateLimited(self.message_key).into_response();
                result.apply_headers(response.headers_mut(), now_ms());
                Err(response)
            }
            Err(e) => {
                tracing::error!(error = %e, scope = self.scope, "Rate limit store failed");
                Ok(None)
            }
        }
    }
}

/// Attach `RateLimit-*` headers to a successful response
pub(crate) fn with_limit_headers(mut response: Response, result: Option<RateLimitResult>) -> Response {
    if let Some(result) = result {
        result.apply_headers(response.headers_mut(), now_ms());
    }
    response
}

/// Middleware keyed by client IP (first `X-Forwarded-For` hop, else the peer)
pub async fn limit_by_client_ip(
    State(limit): State<RouteRateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let peer_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let key = client_key(req.headers(), peer_ip);

    match limit.check(&key).await {
        Ok(result) => with_limit_headers(next.run(req).await, result),
        Err(rejection) => {
            tracing::warn!(client = %key, scope = limit.scope, "Request rate limited");
            rejection
        }
    }
}
