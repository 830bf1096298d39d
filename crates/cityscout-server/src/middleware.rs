use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Maps provider operations onto the route templates that spend them.
const OPERATION_ROUTES: &[(&str, &str)] = &[
    ("/api/v1/geocode", "geocode"),
    ("/api/v1/places", "nearby"),
    ("/api/v1/places/{place_id}", "detail"),
    ("/api/v1/autocomplete", "autocomplete"),
    ("/api/v1/cities/{city}", "city_page"),
];

fn operation_for(route: &str) -> Option<&'static str> {
    OPERATION_ROUTES
        .iter()
        .find(|(template, _)| *template == route)
        .map(|(_, op)| *op)
}

#[derive(Debug, Clone, Copy)]
struct QuotaWindow {
    started_at: Instant,
    used: u32,
}

/// Fixed-window budgets for the maps provider, one per operation.
#[derive(Debug, Clone)]
pub struct ProviderQuota {
    window: Duration,
    limits: HashMap<&'static str, u32>,
    windows: Arc<Mutex<HashMap<&'static str, QuotaWindow>>>,
}

impl ProviderQuota {
    /// Creates a quota with no budgets; operations without a limit are
    /// never throttled.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            limits: HashMap::new(),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn with_limit(mut self, operation: &'static str, max_requests: u32) -> Self {
        self.limits.insert(operation, max_requests);
        self
    }

    /// Spends one request of `operation`'s budget. Returns the time until
    /// the window resets when the budget is exhausted.
    async fn try_spend(&self, operation: &'static str) -> Result<(), (u32, Duration)> {
        let Some(&max) = self.limits.get(operation) else {
            return Ok(());
        };
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows.entry(operation).or_insert(QuotaWindow {
            started_at: now,
            used: 0,
        });

        let elapsed = now.duration_since(window.started_at);
        if elapsed >= self.window {
            *window = QuotaWindow {
                started_at: now,
                used: 0,
            };
        }

        if window.used >= max {
            let retry_after = self.window.saturating_sub(now.duration_since(window.started_at));
            return Err((max, retry_after));
        }
        window.used += 1;
        Ok(())
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Recorded on a `request` span wrapping the rest of the stack
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut res = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Route-layer middleware charging each request against the budget of the
/// provider operation its route performs.
///
/// Rejections use the API error envelope with code `rate_limited` and carry
/// a `Retry-After` header in whole seconds.
pub async fn enforce_provider_quota(
    State(quota): State<ProviderQuota>,
    req: Request,
    next: Next,
) -> Response {
    let operation = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|route| operation_for(route.as_str()));
    let Some(operation) = operation else {
        return next.run(req).await;
    };

    if let Err((max, retry_after)) = quota.try_spend(operation).await {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();
        let secs = retry_after.as_secs().max(1);
        tracing::warn!(operation, max_requests = max, retry_after_secs = secs, "provider quota exhausted");

        let mut res = ApiError::new(
            request_id,
            "rate_limited",
            format!(
                "{operation} quota of {max} requests per {}s exhausted",
                quota.window.as_secs()
            ),
        )
        .into_response();
        res.headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        return res;
    }

    next.run(req).await
}
