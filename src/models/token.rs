use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The decoded payload segment of a session token.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenClaims {
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// The backend sends either a user object or a bare email here.
    #[serde(default)]
    pub user: Option<Value>,
    /// Any additional claim fields we don't explicitly model.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}
