//! `key=value` assignments applied to a draft.
//!
//! The draft is serialized, the assignments are written over its fields and the result is
//! deserialized back. A value replaces a string field verbatim; anywhere else it is read as JSON
//! first (`45`, `12.5`, `true`, `null`) and falls back to a string; a blank value clears it.

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

/// clap value parser for `--set key=value`.
pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(Assignment {
            key: key.trim().to_owned(),
            value: value.to_owned(),
        }),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

pub fn apply<D>(draft: &D, assignments: &[Assignment]) -> anyhow::Result<D>
where
    D: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(draft).context("failed to encode draft")?;
    let Some(fields) = value.as_object_mut() else {
        bail!("draft is not a JSON object");
    };

    for Assignment { key, value: raw } in assignments {
        let Some(current) = fields.get_mut(key) else {
            let known: Vec<&str> = fields.keys().map(String::as_str).collect();
            bail!("unknown field {key:?} (expected one of: {})", known.join(", "));
        };
        *current = coerce(current, raw);
    }

    serde_json::from_value(value).context("invalid field value")
}

fn coerce(current: &Value, raw: &str) -> Value {
    match current {
        Value::String(_) => Value::String(raw.to_owned()),
        _ if raw.trim().is_empty() => Value::Null,
        _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned())),
    }
}
