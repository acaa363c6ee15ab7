//! Cross-domain session hand-off through URL parameters.
//!
//! A page opened with `transfer_token`, `transfer_session`, and
//! `transfer_refresh` query parameters adopts that session: the values are
//! written to credential storage and the parameters are stripped from the
//! address with a history replace.

use reqwest::Url;
use tracing::info;

use haven_core::error::AppError;
use haven_core::result::AppResult;
use haven_entity::SessionCredential;

use crate::credential::CredentialStore;

/// Access token parameter.
pub const TRANSFER_TOKEN: &str = "transfer_token";
/// Session id parameter.
pub const TRANSFER_SESSION: &str = "transfer_session";
/// Refresh token parameter.
pub const TRANSFER_REFRESH: &str = "transfer_refresh";

const TRANSFER_PARAMS: [&str; 3] = [TRANSFER_TOKEN, TRANSFER_SESSION, TRANSFER_REFRESH];

/// Result of a hand-off that adopted credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Path and query of the page with the transfer parameters removed.
    pub cleaned: String,
}

/// Adopt transfer parameters from `url`, if any.
///
/// Returns `None` when the URL carries none of them. Parameters that are
/// present but empty are ignored; an access token is required for the
/// session to be adopted, but the parameters are stripped regardless.
pub fn adopt(url: &str, credentials: &CredentialStore) -> AppResult<Option<Transfer>> {
    let mut parsed = Url::parse(url)
        .map_err(|e| AppError::validation(format!("Invalid start URL '{url}': {e}")))?;

    let mut token = None;
    let mut session = None;
    let mut refresh = None;
    let mut kept = Vec::new();
    for (name, value) in parsed.query_pairs() {
        let value = value.into_owned();
        match name.as_ref() {
            TRANSFER_TOKEN => token = Some(value).filter(|v| !v.is_empty()),
            TRANSFER_SESSION => session = Some(value).filter(|v| !v.is_empty()),
            TRANSFER_REFRESH => refresh = Some(value).filter(|v| !v.is_empty()),
            _ => kept.push((name.to_string(), value)),
        }
    }

    let had_params = parsed
        .query_pairs()
        .any(|(name, _)| TRANSFER_PARAMS.contains(&name.as_ref()));
    if !had_params {
        return Ok(None);
    }

    if let Some(access_token) = token {
        credentials.save(&SessionCredential {
            access_token,
            session_id: session.map(Into::into),
            refresh_token: refresh,
        })?;
        info!("Adopted transferred session");
    }

    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    let cleaned = match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    };
    Ok(Some(Transfer { cleaned }))
}
