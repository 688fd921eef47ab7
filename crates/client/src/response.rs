//! Normalisation of backend replies.
//!
//! The backends disagree on shapes, so every reply goes through [`Reply`]:
//! - lists come as `{ "<collection>": [...] }` or as a bare array
//! - a failure message sits under `message` or `error`
//! - a created or updated record comes bare, or wrapped next to a `message`
//! - a success with an empty or non-JSON body is still a success, just without a record

use deskhub_core::{MutationError, TransportError, ValidationError};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug)]
pub(crate) struct Reply {
    status: StatusCode,
    body: Option<Value>,
}

impl Reply {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, TransportError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::connection(e.to_string()))?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };
        Ok(Self { status, body })
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub(crate) fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub(crate) fn into_body(self) -> Option<Value> {
        self.body
    }

    /// The server's explanation of a failure, if it sent one.
    pub(crate) fn message(&self) -> Option<&str> {
        let body = self.body.as_ref()?;
        ["message", "error"]
            .into_iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
    }

    pub(crate) fn transport_error(&self) -> TransportError {
        TransportError::status(
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or_default(),
        )
    }

    /// Any non-success is a transport error; list failures carry no user-facing message.
    pub(crate) fn into_list(self, key: &str) -> Result<Vec<Value>, TransportError> {
        if !self.is_success() {
            return Err(self.transport_error());
        }
        match self.body {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Object(mut map)) => match map.remove(key) {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(TransportError::connection(format!(
                    "list response has no `{key}` array"
                ))),
            },
            _ => Err(TransportError::connection("list response is not JSON")),
        }
    }

    /// A non-success with a message is a validation failure, without one a transport failure.
    pub(crate) fn into_mutation(self) -> Result<Option<Value>, MutationError> {
        if self.is_success() {
            return Ok(self.body.and_then(extract_record));
        }
        match self.message() {
            Some(message) => Err(ValidationError {
                status: self.status.as_u16(),
                message: message.to_owned(),
            }
            .into()),
            None => Err(self.transport_error().into()),
        }
    }

    pub(crate) fn into_unit(self) -> Result<(), TransportError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.transport_error())
        }
    }
}

fn has_id(value: &Value) -> bool {
    value.get("id").is_some_and(|id| !id.is_null())
}

/// The record in a mutation reply: the body itself, or the one object field carrying an id.
fn extract_record(body: Value) -> Option<Value> {
    if has_id(&body) {
        return Some(body);
    }
    match body {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).find(has_id),
        _ => None,
    }
}
