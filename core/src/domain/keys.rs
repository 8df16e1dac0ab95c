//! Backend key layout.
//!
//! ```text
//! tokens:<token>            =>  <last used time>
//! userdata:<token>:<key>    =>  <value>
//! ```
//!
//! The layout is shared with earlier deployments of the relay and must not change.

use super::entities::token::Token;

/// Separator between key segments
pub const NAMESPACE_SEPARATOR: char = ':';

/// Prefix for any registered token, used or unused
pub const TOKEN_PREFIX: &str = "tokens:";

/// Prefix for any token:key/value mapping
pub const USERDATA_PREFIX: &str = "userdata:";

/// Registry key for a token
pub fn token_key(token: &Token) -> String {
    format!("{}{}", TOKEN_PREFIX, token)
}

/// Data key for `(token, key)`
pub fn userdata_key(token: &Token, key: &str) -> String {
    format!("{}{}", userdata_namespace(token), key)
}

/// Prefix shared by every data key of `token`, separator included
pub fn userdata_namespace(token: &Token) -> String {
    format!("{}{}{}", USERDATA_PREFIX, token, NAMESPACE_SEPARATOR)
}

/// Recover the raw token from a registry key
pub fn token_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(TOKEN_PREFIX)
}
