//! HTTP server setup and the gate handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the gate and health handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Run each request through the gate and the audit sink
//! - Serve until the shutdown coordinator fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::InvalidHeaderName, HeaderMap, HeaderName, Request},
    middleware,
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::audit::{self, AuditSink, FileAuditLog};
use crate::config::{GateConfig, ProxyHeadersConfig};
use crate::gate::{decide, AccessDecision, Verdict};
use crate::http::request::{
    forwarded_client, header_pairs, header_text, propagate_request_id, X_REQUEST_ID,
};
use crate::http::response::GateResponse;
use crate::lifecycle::shutdown::notified;
use crate::observability::metrics::{self, Outcome};

/// Error building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid proxy header name: {0}")]
    InvalidHeader(#[from] InvalidHeaderName),
}

/// Proxy header names, parsed once at startup.
#[derive(Debug, Clone)]
pub struct GateHeaders {
    pub verify: HeaderName,
    pub subject: HeaderName,
    pub client_addr: Option<HeaderName>,
}

impl GateHeaders {
    pub fn from_config(config: &ProxyHeadersConfig) -> Result<Self, InvalidHeaderName> {
        let client_addr = match config.client_addr_header {
            Some(ref name) => Some(HeaderName::from_bytes(name.as_bytes())?),
            None => None,
        };
        Ok(Self {
            verify: HeaderName::from_bytes(config.verify_header.as_bytes())?,
            subject: HeaderName::from_bytes(config.subject_header.as_bytes())?,
            client_addr,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub audit: Arc<dyn AuditSink>,
    pub headers: Arc<GateHeaders>,
    pub utc: bool,
    pub show_request_headers: bool,
}

impl AppState {
    fn now(&self) -> NaiveDateTime {
        if self.utc {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        }
    }

    fn client_addr(&self, headers: &HeaderMap, peer: SocketAddr) -> String {
        self.headers
            .client_addr
            .as_ref()
            .and_then(|name| forwarded_client(headers, name))
            .unwrap_or_else(|| peer.ip().to_string())
    }
}

/// HTTP server for the gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a server that audits to the configured log file.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let sink = Arc::new(FileAuditLog::new(config.audit.path.clone()));
        Self::with_audit_sink(config, sink)
    }

    /// Create a server that audits to the given sink.
    pub fn with_audit_sink(
        config: GateConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ServerError> {
        let state = AppState {
            audit,
            headers: Arc::new(GateHeaders::from_config(&config.proxy)?),
            utc: config.audit.utc,
            show_request_headers: config.presentation.show_request_headers,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        });

        // The gate route is never timed out: once the audit append starts,
        // the request has to end in 200 or 500.
        let timed: Router<AppState> = Router::new()
            .route("/health", get(health_handler))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/", get(gate_handler))
            .merge(timed)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(propagate_request_id))
                    .layer(trace),
            )
    }

    /// Run the server on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            audit_log = ?self.config.audit.path,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(notified(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Gate handler: verdict check, identity extraction, audit, page.
async fn gate_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> GateResponse {
    let verdict = Verdict::from_header(header_text(&headers, &state.headers.verify).as_deref());
    let subject = header_text(&headers, &state.headers.subject).unwrap_or_default();
    let client_addr = state.client_addr(&headers, peer);

    let grant = match decide(&verdict, &subject, &client_addr, state.now()) {
        AccessDecision::Deny(denial) => {
            tracing::warn!(
                verdict = %denial.verdict,
                subject = %denial.subject,
                client_addr = %client_addr,
                "Client certificate rejected"
            );
            metrics::record_outcome(Outcome::Denied);
            let headers = state.show_request_headers.then(|| header_pairs(&headers));
            return GateResponse::Denied { denial, headers };
        }
        AccessDecision::Allow(grant) => grant,
    };

    let start = Instant::now();
    let sink = state.audit.clone();
    let record_grant = grant.clone();
    let result =
        tokio::task::spawn_blocking(move || audit::record(sink.as_ref(), &record_grant)).await;
    metrics::record_audit_append(start);

    match result {
        Ok(Ok(())) => {
            tracing::info!(
                common_name = %grant.identity.common_name,
                email = %grant.identity.email,
                client_addr = %grant.client_addr,
                "Access granted"
            );
            metrics::record_outcome(Outcome::Allowed);
            GateResponse::Granted(grant)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error = %e,
                common_name = %grant.identity.common_name,
                "Audit log write failed"
            );
            metrics::record_outcome(Outcome::LogFailed);
            GateResponse::LogFailed {
                permission_denied: e.is_permission_denied(),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Audit task failed");
            metrics::record_outcome(Outcome::LogFailed);
            GateResponse::LogFailed {
                permission_denied: false,
            }
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn state(client_header: Option<&str>) -> AppState {
        let mut proxy = ProxyHeadersConfig::default();
        proxy.client_addr_header = client_header.map(String::from);
        AppState {
            audit: Arc::new(audit::MemoryAuditLog::new()),
            headers: Arc::new(GateHeaders::from_config(&proxy).unwrap()),
            utc: true,
            show_request_headers: false,
        }
    }

    #[test]
    fn test_header_names_normalized() {
        let headers = GateHeaders::from_config(&ProxyHeadersConfig::default()).unwrap();
        assert_eq!(headers.verify.as_str(), "ssl_client_verify");
        assert_eq!(headers.subject.as_str(), "ssl_client_subject");
        assert!(headers.client_addr.is_none());
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let mut proxy = ProxyHeadersConfig::default();
        proxy.verify_header = "bad header".to_string();
        assert!(GateHeaders::from_config(&proxy).is_err());
    }

    #[test]
    fn test_client_addr_from_peer() {
        let peer: SocketAddr = "192.0.2.10:51000".parse().unwrap();
        assert_eq!(state(None).client_addr(&HeaderMap::new(), peer), "192.0.2.10");
    }

    #[test]
    fn test_client_addr_from_header_with_fallback() {
        let peer: SocketAddr = "127.0.0.1:51000".parse().unwrap();
        let state = state(Some("X-Real-IP"));

        let mut headers = HeaderMap::new();
        assert_eq!(state.client_addr(&headers, peer), "127.0.0.1");

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(state.client_addr(&headers, peer), "198.51.100.4");
    }
}
