//! Request payloads.
//!
//! Each payload lists exactly the fields its operation accepts. Unknown
//! fields, missing fields, wrong types and failed field validation are all
//! reported as `PreconditionFailed`.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use staffgate_core::error::{AppError, ErrorKind};

/// Body of `CreateEmployeeAccount`: the username doubles as the address the
/// signup link is mailed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NewEmployeePayload {
    /// Username of the account to create.
    #[validate(email)]
    pub username: String,
}

/// Body of operations that target one existing account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UsernamePayload {
    /// Username of the target account.
    #[validate(length(min = 1))]
    pub username: String,
}

/// Body of `CompleteSignup` and `Login`.
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CredentialsPayload {
    /// Account username.
    #[validate(length(min = 1))]
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for CredentialsPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `ChangePassword`.
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    /// Password currently on the account.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordPayload").finish_non_exhaustive()
    }
}

/// Deserializes and validates a JSON body against a payload type.
pub fn parse_strict<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let schema_error = |e: serde_json::Error| {
        AppError::with_source(
            ErrorKind::PreconditionFailed,
            "Payload does not match the schema",
            e,
        )
    };

    // Struct derives also accept a positional array; payloads are objects only.
    let fields = match serde_json::from_slice::<Value>(body).map_err(schema_error)? {
        Value::Object(fields) => fields,
        _ => {
            return Err(AppError::precondition_failed("Payload must be a JSON object"));
        }
    };
    let payload: T = serde_json::from_value(Value::Object(fields)).map_err(schema_error)?;

    payload.validate().map_err(|e| {
        AppError::with_source(ErrorKind::PreconditionFailed, "Payload failed validation", e)
    })?;

    Ok(payload)
}
