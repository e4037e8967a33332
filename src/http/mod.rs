//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection from the TLS-terminating proxy
//!     → request.rs (request ID, proxy header extraction)
//!     → server.rs (gate handler: verdict → identity → audit)
//!     → response.rs (403 / 200 / 500 page)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::GateResponse;
pub use server::{AppState, GateHeaders, HttpServer, ServerError};
