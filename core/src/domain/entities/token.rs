//! Token entities for the relay namespace model.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::keys::NAMESPACE_SEPARATOR;
use crate::errors::RelayError;

/// Maximum accepted token length in bytes
pub const MAX_TOKEN_LENGTH: usize = 256;

/// An opaque client token
///
/// A token is any non-empty string without the namespace separator. Without that
/// restriction the data namespace of `a` would be a prefix of the namespace of
/// `a:b`, and cascading deletes for one would sweep up the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Validate and wrap a raw token string
    pub fn parse(raw: impl Into<String>) -> Result<Self, RelayError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(RelayError::InvalidToken {
                reason: "token must not be empty".to_string(),
            });
        }
        if raw.len() > MAX_TOKEN_LENGTH {
            return Err(RelayError::InvalidToken {
                reason: format!("token exceeds {} bytes", MAX_TOKEN_LENGTH),
            });
        }
        if raw.contains(NAMESPACE_SEPARATOR) {
            return Err(RelayError::InvalidToken {
                reason: format!("token must not contain '{}'", NAMESPACE_SEPARATOR),
            });
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Token {
    type Error = RelayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Token::parse(value)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// Registry view of a token: who it is and when it was last used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token: Token,
    pub last_used: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(token: Token, last_used: DateTime<Utc>) -> Self {
        Self { token, last_used }
    }

    /// Whether the token has gone unused for at least `threshold` as of `now`
    ///
    /// A `last_used` in the future (clock skew between writers) is never stale.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: TimeDelta) -> bool {
        self.idle_for(now) >= threshold
    }

    /// Time elapsed since last use; negative under clock skew
    pub fn idle_for(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.last_used)
    }
}

/// Encode a last-used timestamp the way it is stored in the registry
pub fn encode_last_used(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored last-used timestamp
///
/// Accepts RFC 3339 as well as the textual form older deployments wrote,
/// e.g. `2024-03-01 10:15:30.123456789 +0100 CET m=+0.004512001`.
pub fn parse_last_used(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    let without_monotonic = raw.split(" m=").next()?.trim();
    let mut parts: Vec<&str> = without_monotonic.split_whitespace().collect();
    // date, time, numeric offset and an optional zone abbreviation
    if parts.len() == 4 {
        parts.pop();
    }
    if parts.len() != 3 {
        return None;
    }

    DateTime::parse_from_str(&parts.join(" "), "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Convert a std duration into a chrono delta, saturating on overflow
pub fn threshold_from_std(duration: std::time::Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
