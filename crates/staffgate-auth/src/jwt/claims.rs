//! Claims carried by session and provisioning tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffgate_core::types::AccountId;

/// JWT claims payload.
///
/// A session token carries `accountId`, `username` and `accountAccess: true`.
/// A provisioning token carries only `username`. Absent claims are omitted
/// from the encoded payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Account the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Username the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Set to `true` only on session tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_access: Option<bool>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id.
    pub jti: Uuid,
}

impl Claims {
    /// Whether the token grants general API access.
    pub fn grants_account_access(&self) -> bool {
        self.account_access == Some(true)
    }

    /// Returns the issued-at instant.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiration instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token was issued before the given instant, compared at
    /// whole-second resolution.
    pub fn issued_before(&self, instant: DateTime<Utc>) -> bool {
        self.iat < instant.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioning() -> Claims {
        Claims {
            account_id: None,
            username: Some("new@x.com".into()),
            account_access: None,
            iat: 1_700_000_000,
            exp: 1_700_000_300,
            jti: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_provisioning_payload_omits_access_claims() {
        let json = serde_json::to_value(provisioning()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("accountId"));
        assert!(!object.contains_key("accountAccess"));
        assert_eq!(object["username"], "new@x.com");
    }

    #[test]
    fn test_only_true_grants_access() {
        let mut claims = provisioning();
        assert!(!claims.grants_account_access());
        claims.account_access = Some(false);
        assert!(!claims.grants_account_access());
        claims.account_access = Some(true);
        assert!(claims.grants_account_access());
    }

    #[test]
    fn test_issued_before_uses_whole_seconds() {
        let claims = provisioning();
        let same_second = DateTime::from_timestamp(claims.iat, 900_000_000).unwrap();
        let next_second = DateTime::from_timestamp(claims.iat + 1, 0).unwrap();
        assert!(!claims.issued_before(same_second));
        assert!(claims.issued_before(next_second));
    }
}
