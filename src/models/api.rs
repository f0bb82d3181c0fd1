use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope the backend wraps JSON replies in. Negative codes are failures.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiResponse {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.ret_code >= 0
    }
}

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}
