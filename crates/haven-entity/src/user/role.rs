//! Account and routing roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried by an authenticated account.
///
/// There is no `public` variant: an anonymous visitor has no identity at
/// all, see [`RouteRole::Public`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Regular marketplace member.
    User,
    /// Administrator (subject to approval unless default admin).
    Admin,
    /// Root administrator.
    RootAdmin,
}

impl AccountRole {
    /// Namespace this account is routed into. Root admins route as admins.
    pub fn route_role(&self) -> RouteRole {
        match self {
            Self::User => RouteRole::User,
            Self::Admin | Self::RootAdmin => RouteRole::Admin,
        }
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::RootAdmin => "rootadmin",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = haven_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "rootadmin" => Ok(Self::RootAdmin),
            _ => Err(haven_core::AppError::validation(format!(
                "Invalid account role: '{s}'. Expected one of: user, admin, rootadmin"
            ))),
        }
    }
}

/// Role used to pick a route namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteRole {
    /// Anonymous visitor (no identity).
    Public,
    /// Signed-in member, routed under `/user`.
    User,
    /// Signed-in administrator, routed under `/admin`.
    Admin,
}

impl RouteRole {
    /// Derive the routing role from the current identity, if any.
    pub fn of(identity: Option<&super::Identity>) -> Self {
        identity.map_or(Self::Public, |i| i.role.route_role())
    }

    /// Home path of the namespace.
    pub fn home(&self) -> &'static str {
        match self {
            Self::Public => "/",
            Self::User => "/user",
            Self::Admin => "/admin",
        }
    }
}

impl fmt::Display for RouteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
