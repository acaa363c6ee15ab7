//! Decoded HTTP responses.

use serde_json::Value;

/// Structured error code for a suspended account.
pub const SUSPENDED_CODE: &str = "ACCOUNT_SUSPENDED";

/// Status code and JSON body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body, `Null` when empty or not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// Build a response from parts.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// `message` field of the body.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// `code` field of the body.
    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    /// Whether this response reports a suspended account.
    ///
    /// A 403 whose body carries the `ACCOUNT_SUSPENDED` code, or whose
    /// message contains "suspended" in any case.
    pub fn is_suspension(&self) -> bool {
        if self.status != 403 {
            return false;
        }
        if self.code() == Some(SUSPENDED_CODE) {
            return true;
        }
        self.message()
            .is_some_and(|m| m.to_lowercase().contains("suspended"))
    }

    /// Whether the body explicitly says the caller is not authenticated.
    pub fn denies_authentication(&self) -> bool {
        self.body.get("authenticated").and_then(Value::as_bool) == Some(false)
    }
}
