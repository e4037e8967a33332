//! Audit log line format.

use std::fmt;

use crate::gate::Grant;

/// First line of every audit log.
pub const HEADER: &str = "timestamp, nombre, email, ip";

/// One granted access, as written to the audit log.
///
/// Fields are written verbatim and separated by `", "`. Values are not
/// quoted, so a comma inside a common name shows up as an extra column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: String,
    pub common_name: String,
    pub email: String,
    pub client_addr: String,
}

impl AuditRecord {
    /// Line to append, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl From<&Grant> for AuditRecord {
    fn from(grant: &Grant) -> Self {
        Self {
            timestamp: grant.formatted_timestamp(),
            common_name: grant.identity.common_name.clone(),
            email: grant.identity.email.clone(),
            client_addr: grant.client_addr.clone(),
        }
    }
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.timestamp, self.common_name, self.email, self.client_addr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use chrono::NaiveDate;

    #[test]
    fn test_line_from_grant() {
        let grant = Grant {
            identity: Identity::from_subject("/CN=Juan Perez/emailAddress=juan.perez@ejemplo.com"),
            client_addr: "192.168.1.20".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 9)
                .unwrap()
                .and_hms_opt(8, 5, 3)
                .unwrap(),
        };

        let record = AuditRecord::from(&grant);
        assert_eq!(
            record.to_line(),
            "2025-01-09 08:05:03, Juan Perez, juan.perez@ejemplo.com, 192.168.1.20\n"
        );
    }
}
