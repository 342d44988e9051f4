//! Request extractors shared by both tiers.

use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::{HeaderValue, header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_RECORD_ID_LEN: usize = 64;

/// Identifier of a stored record.
///
/// Store keys are strings. Integer ids coming from a URL (`/delete/42`) are
/// kept as their decimal text, so `42` and `"42"` name the same record. Only
/// ASCII alphanumerics, `-` and `_` are accepted, 1 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= MAX_RECORD_ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid record id: {:?}",
                s
            )))
        }
    }
}

impl TryFrom<String> for RecordId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid path: {}", e)))?;

        raw.parse()
    }
}

/// The inbound `Authorization` header, kept as raw header bytes so it can be
/// forwarded without decoding or re-encoding. Nothing about the token is
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader(pub HeaderValue);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthorizationHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .cloned()
            .map(AuthorizationHeader)
            .ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!("Missing Authorization header"))
            })
    }
}
