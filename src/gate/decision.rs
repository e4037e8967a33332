//! Access decision.

use chrono::NaiveDateTime;

use crate::gate::verdict::Verdict;
use crate::identity::Identity;

/// Timestamp format used for display and for the audit log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A granted access, ready to be audited and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub identity: Identity,
    pub client_addr: String,
    pub timestamp: NaiveDateTime,
}

impl Grant {
    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A rejected access. Carries the raw proxy inputs for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub verdict: String,
    pub subject: String,
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(Grant),
    Deny(Denial),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }
}

/// Decide whether a request gets through.
///
/// The subject is only parsed after the verdict is accepted.
pub fn decide(
    verdict: &Verdict,
    subject: &str,
    client_addr: &str,
    now: NaiveDateTime,
) -> AccessDecision {
    if !verdict.is_success() {
        return AccessDecision::Deny(Denial {
            verdict: verdict.as_str().to_string(),
            subject: subject.to_string(),
        });
    }

    AccessDecision::Allow(Grant {
        identity: Identity::from_subject(subject),
        client_addr: client_addr.to_string(),
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{UNKNOWN_EMAIL, UNKNOWN_NAME};
    use chrono::NaiveDate;

    fn at_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(12, 0, 7)
            .unwrap()
    }

    #[test]
    fn test_success_allows_with_identity() {
        let decision = decide(
            &Verdict::parse("SUCCESS"),
            "/C=ES/CN=Juan Perez/emailAddress=juan.perez@ejemplo.com",
            "10.0.0.8",
            at_noon(),
        );

        let AccessDecision::Allow(grant) = decision else {
            panic!("expected allow");
        };
        assert_eq!(grant.identity.common_name, "Juan Perez");
        assert_eq!(grant.identity.email, "juan.perez@ejemplo.com");
        assert_eq!(grant.client_addr, "10.0.0.8");
        assert_eq!(grant.formatted_timestamp(), "2024-03-05 12:00:07");
    }

    #[test]
    fn test_missing_verdict_denies() {
        let decision = decide(&Verdict::from_header(None), "/CN=Mallory", "10.0.0.8", at_noon());
        assert_eq!(
            decision,
            AccessDecision::Deny(Denial {
                verdict: "NONE".to_string(),
                subject: "/CN=Mallory".to_string(),
            })
        );
    }

    #[test]
    fn test_any_other_verdict_denies() {
        for raw in ["", "FAILED:certificate has expired", "success", "SUCCESS\n"] {
            let decision = decide(&Verdict::parse(raw), "/CN=x", "1.2.3.4", at_noon());
            assert!(!decision.is_allowed(), "{raw:?} must be denied");
        }
    }

    #[test]
    fn test_success_without_identity_fields() {
        let decision = decide(&Verdict::Success, "/C=ES/O=Test", "::1", at_noon());
        let AccessDecision::Allow(grant) = decision else {
            panic!("expected allow");
        };
        assert_eq!(grant.identity.common_name, UNKNOWN_NAME);
        assert_eq!(grant.identity.email, UNKNOWN_EMAIL);
    }
}
