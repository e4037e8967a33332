//! Proxy verification verdict.

use std::fmt;

/// The only verdict value that grants access.
pub const SUCCESS: &str = "SUCCESS";

/// Value used when the proxy sent no verdict header.
pub const MISSING: &str = "NONE";

/// Verification verdict asserted by the TLS-terminating proxy.
///
/// Built through an allow-list: only the exact literal `SUCCESS` maps to
/// [`Verdict::Success`]. Everything else, including case variants and the
/// empty string, is kept verbatim in [`Verdict::NotSuccess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    NotSuccess(String),
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        if raw == SUCCESS {
            Verdict::Success
        } else {
            Verdict::NotSuccess(raw.to_string())
        }
    }

    /// Verdict for an optional header value; absence becomes `NONE`.
    pub fn from_header(raw: Option<&str>) -> Self {
        Self::parse(raw.unwrap_or(MISSING))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Success => SUCCESS,
            Verdict::NotSuccess(raw) => raw,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
