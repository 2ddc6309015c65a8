//! Session record

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Durable session record.
///
/// The auth token's presence is what the client shell renders as "signed in".
/// Errors are keyed by the microsecond timestamp at which they were recorded
/// and shown on the sign-in screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default)]
    pub errors: BTreeMap<String, String>,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl SessionRecord {
    pub fn is_signed_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Build the merge patch that adds `errors`, each keyed by the
    /// microsecond timestamp it was raised at. Existing entries are kept.
    pub fn errors_patch<'a, I>(errors: I) -> serde_json::Value
    where
        I: IntoIterator<Item = (i64, &'a str)>,
    {
        let errors: serde_json::Map<String, serde_json::Value> = errors
            .into_iter()
            .map(|(timestamp_micros, message)| (timestamp_micros.to_string(), message.into()))
            .collect();
        serde_json::json!({ "errors": errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record() {
        let record: SessionRecord = serde_json::from_str("{}").unwrap();
        assert!(!record.is_signed_in());
        assert!(record.errors.is_empty());
    }

    #[test]
    fn test_signed_in() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"authToken": "tok", "email": "a@b.c"}"#).unwrap();
        assert!(record.is_signed_in());
        assert_eq!(record.unknown_fields["email"], "a@b.c");
    }

    #[test]
    fn test_empty_token_is_signed_out() {
        let record = SessionRecord {
            auth_token: Some(String::new()),
            ..Default::default()
        };
        assert!(!record.is_signed_in());
    }

    #[test]
    fn test_errors_patch_shape() {
        let patch = SessionRecord::errors_patch([
            (1_700_000_000_000_001, "Session expired"),
            (1_700_000_000_000_002, "Signed out elsewhere"),
        ]);
        assert_eq!(patch["errors"]["1700000000000001"], "Session expired");
        assert_eq!(patch["errors"]["1700000000000002"], "Signed out elsewhere");
        assert_eq!(patch["errors"].as_object().unwrap().len(), 2);
    }
}
