//! Client-certificate access gate.
//!
//! Runs behind a TLS-terminating reverse proxy, trusts the verdict and
//! subject DN the proxy forwards in request headers, and records every
//! granted access in an append-only audit log.

pub mod audit;
pub mod config;
pub mod gate;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use gate::{decide, AccessDecision, Verdict};
pub use http::HttpServer;
pub use identity::Identity;
pub use lifecycle::Shutdown;
