use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::WorkflowError;

/// Opaque bearer token issued on a successful admin login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The single admin account the console accepts.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are always compared, in time independent of where they differ.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

fn constant_time_eq(expected: &[u8], given: &[u8]) -> bool {
    if expected.len() != given.len() {
        return false;
    }
    expected
        .iter()
        .zip(given)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proof of a successful login, handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionGrant {
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token: SessionToken::generate(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(SessionGrant),
}

impl Session {
    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Verifies `token` against the live session at `now`.
    pub fn check(&self, token: &SessionToken, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        match self {
            Session::Authenticated(grant) if grant.token == *token => {
                if now >= grant.expires_at {
                    Err(WorkflowError::SessionExpired)
                } else {
                    Ok(())
                }
            }
            _ => Err(WorkflowError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_match_exactly() {
        let creds = AdminCredentials::new("admin", "s3cret");
        assert!(creds.matches("admin", "s3cret"));
        assert!(!creds.matches("admin", "wrong"));
        assert!(!creds.matches("Admin", "s3cret"));
        assert!(!creds.matches("", ""));
    }

    #[test]
    fn test_constant_time_eq_rejects_prefix_and_length_mismatch() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(!constant_time_eq(b"s3cret", b"s3cre"));
        assert!(!constant_time_eq(b"s3cret", b"s3cret!"));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", AdminCredentials::new("admin", "s3cret"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("admin"));
    }

    #[test]
    fn test_token_round_trips_through_display() {
        let token = SessionToken::generate();
        assert_eq!(SessionToken::parse(&token.to_string()), Some(token));
        assert_eq!(SessionToken::parse("not-a-token"), None);
    }

    #[test]
    fn test_grant_expiry_follows_ttl() {
        let now = Utc::now();
        let grant = SessionGrant::issue(now, Duration::minutes(30));
        assert_eq!(grant.issued_at, now);
        assert_eq!(grant.expires_at - grant.issued_at, Duration::minutes(30));
    }

    #[test]
    fn test_check_accepts_live_session() {
        let now = Utc::now();
        let grant = SessionGrant::issue(now, Duration::minutes(60));
        let session = Session::Authenticated(grant.clone());
        assert!(session.check(&grant.token, now + Duration::minutes(59)).is_ok());
    }

    #[test]
    fn test_check_rejects_other_token() {
        let now = Utc::now();
        let session = Session::Authenticated(SessionGrant::issue(now, Duration::minutes(60)));
        assert_eq!(
            session.check(&SessionToken::generate(), now),
            Err(WorkflowError::Unauthenticated)
        );
    }

    #[test]
    fn test_check_rejects_expired_session() {
        let now = Utc::now();
        let grant = SessionGrant::issue(now, Duration::minutes(60));
        let session = Session::Authenticated(grant.clone());
        assert_eq!(
            session.check(&grant.token, now + Duration::minutes(60)),
            Err(WorkflowError::SessionExpired)
        );
    }

    #[test]
    fn test_unauthenticated_rejects_everything() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(
            session.check(&SessionToken::generate(), Utc::now()),
            Err(WorkflowError::Unauthenticated)
        );
    }
}
