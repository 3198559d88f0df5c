//! Tagged result decoding.
//!
//! Mutating endpoints answer with a JSON array whose first element is either
//! the literal `"Error"` followed by a human-readable message, or a success
//! marker optionally followed by a payload. This module turns that shape into
//! [`Tagged`] once, at the client boundary, so nothing downstream ever has to
//! look at element 0 again.

use serde_json::Value;

use crate::error::RegistryError;

/// Literal marker in element 0 of a failed result.
pub const ERROR_TAG: &str = "Error";

#[derive(Debug, Clone, PartialEq)]
pub enum Tagged {
    Ok(Option<Value>),
    Error(String),
}

impl Tagged {
    pub fn from_value(value: Value) -> Result<Self, RegistryError> {
        match value {
            Value::Array(mut items) => {
                let is_error = matches!(items.first(), Some(Value::String(tag)) if tag == ERROR_TAG);
                if items.is_empty() {
                    Err(RegistryError::Malformed("empty result".into()))
                } else if is_error {
                    match items.get(1).and_then(Value::as_str) {
                        Some(message) => Ok(Self::Error(message.to_string())),
                        None => Err(RegistryError::Malformed("error result without a message".into())),
                    }
                } else {
                    let payload = if items.len() > 1 { Some(items.swap_remove(1)) } else { None };
                    Ok(Self::Ok(payload))
                }
            }
            // Some endpoints return the success payload bare.
            Value::Object(map) => Ok(Self::Ok(Some(Value::Object(map)))),
            other => Err(RegistryError::Malformed(format!("untagged result: {}", other))),
        }
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, RegistryError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// `Error` becomes [`RegistryError::Rejected`].
    pub fn into_result(self) -> Result<Option<Value>, RegistryError> {
        match self {
            Self::Ok(payload) => Ok(payload),
            Self::Error(message) => Err(RegistryError::Rejected(message)),
        }
    }
}

/// Interpret a predict response body.
///
/// Success is raw CSV. A JSON array is read as a tagged result instead: an
/// error tag is a rejection and a string payload is the CSV itself. Anything
/// else that is not an array is passed through untouched.
pub fn csv_payload(body: Vec<u8>) -> Result<Vec<u8>, RegistryError> {
    let value = match serde_json::from_slice::<Value>(&body) {
        Ok(value @ Value::Array(_)) => value,
        _ => return Ok(body),
    };
    match Tagged::from_value(value)?.into_result()? {
        Some(Value::String(csv)) => Ok(csv.into_bytes()),
        Some(other) => Err(RegistryError::Malformed(format!("unexpected prediction payload: {}", other))),
        None => Err(RegistryError::Malformed("prediction result without data".into())),
    }
}
