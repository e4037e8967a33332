//! Identity extraction subsystem.
//!
//! # Data Flow
//! ```text
//! Subject header (e.g. "/C=ES/CN=Juan Perez/emailAddress=juan@ejemplo.com")
//!     → dn.rs (tokenize into key → value, last write wins)
//!     → Identity (common name + email, sentinel defaults)
//! ```
//!
//! # Design Decisions
//! - Parsing never fails: a partial identity beats rejecting a verified client
//! - Embedded `/` inside a value is not unescaped and splits the field
//! - Only invoked after the gate has accepted the verdict

pub mod dn;

pub use dn::{Identity, SubjectDn, UNKNOWN_EMAIL, UNKNOWN_NAME};
