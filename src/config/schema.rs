//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section is optional; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Names of the headers asserted by the reverse proxy.
    pub proxy: ProxyHeadersConfig,

    /// Audit log settings.
    pub audit: AuditConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Response rendering settings.
    pub presentation: PresentationConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Headers set by the TLS-terminating proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyHeadersConfig {
    /// Header carrying the verification verdict (`SUCCESS` on success).
    pub verify_header: String,

    /// Header carrying the client certificate subject DN.
    pub subject_header: String,

    /// Header carrying the original client address (e.g. "X-Real-IP").
    /// When unset, the TCP peer address is recorded.
    pub client_addr_header: Option<String>,
}

impl Default for ProxyHeadersConfig {
    fn default() -> Self {
        Self {
            verify_header: "SSL_CLIENT_VERIFY".to_string(),
            subject_header: "SSL_CLIENT_SUBJECT".to_string(),
            client_addr_header: None,
        }
    }
}

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Path of the append-only access log.
    pub path: PathBuf,

    /// Record timestamps in UTC instead of local time.
    pub utc: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("user_access.log"),
            utc: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds for auxiliary routes. The gate route
    /// is not timed out.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Response rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// List the request headers on the rejection page.
    pub show_request_headers: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            show_request_headers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
        assert_eq!(config.proxy.verify_header, "SSL_CLIENT_VERIFY");
        assert_eq!(config.proxy.subject_header, "SSL_CLIENT_SUBJECT");
        assert!(config.proxy.client_addr_header.is_none());
        assert_eq!(config.audit.path, PathBuf::from("user_access.log"));
        assert!(!config.audit.utc);
        assert!(config.presentation.show_request_headers);
    }

    #[test]
    fn test_partial_toml() {
        let config: GateConfig = toml::from_str(
            r#"
            [proxy]
            client_addr_header = "X-Real-IP"

            [audit]
            path = "/var/log/pki/user_access.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.verify_header, "SSL_CLIENT_VERIFY");
        assert_eq!(config.proxy.client_addr_header.as_deref(), Some("X-Real-IP"));
        assert_eq!(config.audit.path, PathBuf::from("/var/log/pki/user_access.log"));
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
