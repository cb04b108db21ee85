//! `StrictJson` extractor: every body problem is a `PreconditionFailed`.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use staffgate_core::error::{AppError, ErrorKind};
use staffgate_service::payload::parse_strict;

use crate::error::ApiError;

/// A request body parsed into an exact payload type.
#[derive(Debug, Clone)]
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            AppError::with_source(ErrorKind::PreconditionFailed, "Unreadable request body", e)
        })?;
        Ok(StrictJson(parse_strict(&bytes)?))
    }
}
