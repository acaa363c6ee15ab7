//! Identity model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use haven_core::types::UserId;

use super::role::AccountRole;
use super::status::ApprovalStatus;

/// The signed-in principal as the client believes it to be.
///
/// Absence of an identity means the visitor is public; there is no
/// "public" identity value. Profile updates replace the identity wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Backend id of the account.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Account role.
    pub role: AccountRole,
    /// Whether this is the built-in default administrator.
    #[serde(default)]
    pub is_default_admin: bool,
    /// Approval state, only meaningful for non-root admins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_approval_status: Option<ApprovalStatus>,
    /// Whether the account is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining profile fields, carried through untouched.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Identity {
    /// Minimal identity with the given id and role.
    pub fn new(id: impl Into<UserId>, role: AccountRole) -> Self {
        Self {
            id: id.into(),
            role,
            is_default_admin: false,
            admin_approval_status: None,
            is_suspended: false,
            username: None,
            email: None,
            profile: Map::new(),
        }
    }

    /// Whether this identity is the subject with the given id.
    pub fn is(&self, id: &UserId) -> bool {
        &self.id == id
    }
}
