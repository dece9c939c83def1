use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity payload carried by an access token.
///
/// `id`, `sub` and `iss` all hold the string form of the user id the token was
/// issued to. They are derived from the authenticated user, never from request input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier (custom claim)
    pub id: String,

    /// Username at the time of issuance (custom claim)
    pub username: String,

    /// Subject
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Validity window of every issued token.
    pub const VALIDITY_HOURS: i64 = 24;

    /// Build claims for a user, issued now.
    pub fn for_user(user_id: impl ToString, username: impl Into<String>) -> Self {
        Self::issued_at(user_id, username, Utc::now())
    }

    /// Build claims for a user as if issued at `issued_at`.
    ///
    /// Expiration is always `issued_at` plus [`Claims::VALIDITY_HOURS`].
    pub fn issued_at(
        user_id: impl ToString,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let id = user_id.to_string();
        let expiration = issued_at + Duration::hours(Self::VALIDITY_HOURS);

        Self {
            sub: id.clone(),
            iss: id.clone(),
            id,
            username: username.into(),
            exp: expiration.timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is expired once the current time reaches its expiration.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_for_user_derives_identity_fields() {
        let claims = Claims::for_user(7_i64, "bob");

        assert_eq!(claims.id, "7");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.iss, "7");
        assert_eq!(claims.username, "bob");
    }

    #[test]
    fn test_expiration_is_fixed_window() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let claims = Claims::issued_at(1_i64, "alice", issued);

        assert_eq!(claims.iat, issued.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(
            claims.expires_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::issued_at(1_i64, "alice", Utc.timestamp_opt(0, 0).unwrap());
        let exp = claims.exp;

        assert!(!claims.is_expired(exp - 1));
        assert!(claims.is_expired(exp));
        assert!(claims.is_expired(exp + 1));
    }
}
