//! User id extraction from an access token.
//!
//! The token is only decoded, never verified: the id is used to pick the
//! user room, and the server authorises the join itself.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use haven_core::types::UserId;

const ID_CLAIMS: [&str; 4] = ["id", "_id", "userId", "sub"];

/// User id carried in the payload of a JWT, if any.
pub fn user_id_from_token(token: &str) -> Option<UserId> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    ID_CLAIMS
        .iter()
        .find_map(|claim| claims.get(*claim).and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(UserId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(claims))
    }

    #[test]
    fn test_reads_id_claims_in_order() {
        assert_eq!(user_id_from_token(&jwt(r#"{"id":"u1","sub":"x"}"#)).unwrap().as_str(), "u1");
        assert_eq!(user_id_from_token(&jwt(r#"{"sub":"u2"}"#)).unwrap().as_str(), "u2");
        assert_eq!(user_id_from_token(&jwt(r#"{"userId":"u3"}"#)).unwrap().as_str(), "u3");
    }

    #[test]
    fn test_garbage_yields_none() {
        assert_eq!(user_id_from_token("opaque-token"), None);
        assert_eq!(user_id_from_token("a.!!!.c"), None);
        assert_eq!(user_id_from_token(&jwt(r#"{"role":"user"}"#)), None);
        assert_eq!(user_id_from_token(&jwt(r#"{"id":""}"#)), None);
    }
}
