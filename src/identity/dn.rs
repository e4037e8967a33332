//! Slash-delimited Subject DN parsing.

use std::collections::HashMap;

/// Common name used when the subject carries no `CN` field.
pub const UNKNOWN_NAME: &str = "Desconocido";

/// Email used when the subject carries no `emailAddress` field.
pub const UNKNOWN_EMAIL: &str = "No disponible";

const CN_KEY: &str = "CN";
const EMAIL_KEY: &str = "emailAddress";

/// Tokenized Subject DN: field key to value.
///
/// Keys are case-sensitive. A key that appears more than once keeps the
/// value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDn {
    fields: HashMap<String, String>,
}

impl SubjectDn {
    /// Tokenize a subject of the form `/Key=Value/Key=Value...`.
    ///
    /// Empty segments and segments without `=` are skipped.
    pub fn parse(subject: &str) -> Self {
        let mut fields = HashMap::new();

        for segment in subject.split('/') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            if let Some((key, value)) = segment.split_once('=') {
                fields.insert(key.to_string(), value.to_string());
            }
        }

        Self { fields }
    }

    /// Value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Number of distinct field keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no `Key=Value` field was found.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Human identity of an authenticated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub common_name: String,
    pub email: String,
}

impl Identity {
    /// Extract the identity from a raw subject string. Never fails.
    pub fn from_subject(subject: &str) -> Self {
        Self::from(&SubjectDn::parse(subject))
    }
}

impl From<&SubjectDn> for Identity {
    fn from(dn: &SubjectDn) -> Self {
        Self {
            common_name: dn.get(CN_KEY).unwrap_or(UNKNOWN_NAME).to_string(),
            email: dn.get(EMAIL_KEY).unwrap_or(UNKNOWN_EMAIL).to_string(),
        }
    }
}
