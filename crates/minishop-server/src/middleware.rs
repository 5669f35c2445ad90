use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// An inbound `x-request-id` header is honored; otherwise a new `UUIDv4` is
/// generated. The ID lands in the request extensions as [`RequestId`] and is
/// echoed on the response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", value);
    }

    res
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    served: usize,
}

/// Fixed-window request limiter guarding the API routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                served: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct RateLimitBody {
    message: &'static str,
}

/// Middleware enforcing the fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    {
        let mut window = limiter.current.lock().await;
        if window.opened_at.elapsed() >= limiter.window {
            window.opened_at = Instant::now();
            window.served = 0;
        }
        if window.served >= limiter.max_requests {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitBody {
                    message: "rate limit exceeded",
                }),
            )
                .into_response();
        }
        window.served += 1;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn window_resets_after_elapsed_duration() {
        let limiter = RateLimitState::new(1, Duration::from_millis(10));
        {
            let mut window = limiter.current.lock().await;
            window.served = 1;
            window.opened_at = Instant::now() - Duration::from_millis(20);
        }
        // A fresh window must accept the next request.
        let window = limiter.current.lock().await;
        assert!(window.opened_at.elapsed() >= limiter.window);
    }
}
