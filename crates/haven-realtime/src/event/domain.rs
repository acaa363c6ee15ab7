//! Events published to downstream consumers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use haven_core::types::UserId;
use haven_entity::Identity;

/// Server-pushed application events carried by the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum DomainEvent {
    /// An account was suspended.
    #[serde(rename = "account_suspended")]
    AccountSuspended {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// An administrator signed a user out.
    #[serde(rename = "force_signout")]
    ForceSignout {
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(default)]
        message: Option<String>,
    },
    /// A user account changed.
    #[serde(rename = "user_update")]
    UserUpdate(AccountChange),
    /// An admin account changed.
    #[serde(rename = "admin_update")]
    AdminUpdate(AccountChange),
    #[serde(rename = "notificationCreated")]
    NotificationCreated(Value),
    #[serde(rename = "watchlistNotification")]
    WatchlistNotification(Value),
    #[serde(rename = "commentUpdate")]
    CommentUpdate(Value),
    #[serde(rename = "pre_booking_message")]
    PreBookingMessage(Value),
    #[serde(rename = "wishlist_update")]
    WishlistUpdate(Value),
}

impl DomainEvent {
    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountSuspended { .. } => "account_suspended",
            Self::ForceSignout { .. } => "force_signout",
            Self::UserUpdate(_) => "user_update",
            Self::AdminUpdate(_) => "admin_update",
            Self::NotificationCreated(_) => "notificationCreated",
            Self::WatchlistNotification(_) => "watchlistNotification",
            Self::CommentUpdate(_) => "commentUpdate",
            Self::PreBookingMessage(_) => "pre_booking_message",
            Self::WishlistUpdate(_) => "wishlist_update",
        }
    }

    /// The account this event is about, for account-level events.
    pub fn subject(&self) -> Option<&UserId> {
        match self {
            Self::AccountSuspended { user_id } | Self::ForceSignout { user_id, .. } => Some(user_id),
            Self::UserUpdate(change) | Self::AdminUpdate(change) => Some(change.subject()),
            _ => None,
        }
    }
}

/// Body of `user_update` / `admin_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountChange {
    /// Account created.
    Add { user: Identity },
    /// Account changed; the identity replaces the old one.
    Update { user: Identity },
    /// Account removed.
    Delete {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
}

impl AccountChange {
    /// Account the change applies to.
    pub fn subject(&self) -> &UserId {
        match self {
            Self::Add { user } | Self::Update { user } => &user.id,
            Self::Delete { user_id } => user_id,
        }
    }
}
