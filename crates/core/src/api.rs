//! Data-access seam between controllers and the REST backend.
//!
//! [`ResourceApi`] is the untyped, object-safe contract an HTTP client implements: one request
//! per call, JSON in and out, and the transport/validation split of failures. [`Resource`]
//! layers a typed record and draft on top of a [`ResourcePath`] so controllers can work with
//! concrete structs.
//!
//! Implementations never mutate shared state; they only issue the request.

use crate::error::{DecodeError, MutationError, PreconditionError, TransportError};
use async_trait::async_trait;
use deskhub_types::RecordId;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Location of one resource collection on the backend.
///
/// Collections live at `/{domain}/{collection}` and single records at
/// `/{domain}/{item}/{id}`. For most resources `item == collection`; the cloud storage backend
/// uses singular item segments (`/cloud/folders` vs `/cloud/folder/{id}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourcePath {
    domain: &'static str,
    collection: &'static str,
    item: &'static str,
    key: &'static str,
}

impl ResourcePath {
    /// A collection under `domain`. An empty domain puts the collection at the API root.
    pub const fn new(domain: &'static str, collection: &'static str) -> Self {
        Self {
            domain,
            collection,
            item: collection,
            key: collection,
        }
    }

    pub const fn with_item_segment(mut self, item: &'static str) -> Self {
        self.item = item;
        self
    }

    /// Key under which list responses wrap the records (`{ "<key>": [...] }`).
    pub const fn with_collection_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn collection_key(&self) -> &'static str {
        self.key
    }

    /// Human-readable plural used in messages ("patients", "purchase orders").
    pub fn plural(&self) -> String {
        self.collection.replace('-', " ")
    }

    pub fn collection_path(&self) -> String {
        join_segments(&[self.domain, self.collection])
    }

    pub fn item_path(&self, id: &RecordId) -> String {
        join_segments(&[self.domain, self.item, id.as_str()])
    }
}

fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
}

/// Query-string filters for a list request, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery(Vec<(String, String)>);

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One request per call against the REST backend.
///
/// - `list` fails with [`TransportError`] on any non-success status.
/// - `create` and `update` split failures: a structured server message is a
///   [`MutationError::Validation`], anything else a [`MutationError::Transport`]. A success
///   without a JSON body yields `Ok(None)`.
/// - `delete` failures are always transport errors.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list(
        &self,
        path: &ResourcePath,
        query: &ListQuery,
    ) -> Result<Vec<Value>, TransportError>;

    async fn create(
        &self,
        path: &ResourcePath,
        body: Value,
    ) -> Result<Option<Value>, MutationError>;

    async fn update(
        &self,
        path: &ResourcePath,
        id: &RecordId,
        body: Value,
    ) -> Result<Option<Value>, MutationError>;

    async fn delete(&self, path: &ResourcePath, id: &RecordId) -> Result<(), TransportError>;
}

/// Records that carry a backend-assigned identity.
pub trait Identified {
    fn id(&self) -> &RecordId;
}

/// A typed resource: where it lives, what its records and drafts look like, and which local
/// checks a draft must pass before it is submitted.
pub trait Resource: Send + Sync + 'static {
    type Record: Identified + DeserializeOwned + Clone + Send + Sync;
    type Draft: Serialize + Default + Clone + Send + Sync;

    const PATH: ResourcePath;

    /// Singular label used in notifications ("Patient", "Purchase order").
    const LABEL: &'static str;

    /// Seed an edit draft from an existing record.
    fn seed_draft(record: &Self::Record) -> Self::Draft;

    /// Local preconditions; a failure means no request is issued.
    fn check_draft(_draft: &Self::Draft) -> Result<(), PreconditionError> {
        Ok(())
    }

    fn delete_prompt() -> String {
        format!(
            "Are you sure you want to delete this {}?",
            Self::LABEL.to_lowercase()
        )
    }
}

pub fn decode_record<R: Resource>(value: Value) -> Result<R::Record, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError {
        resource: R::PATH.collection_key().to_owned(),
        source,
    })
}

pub fn decode_records<R: Resource>(values: Vec<Value>) -> Result<Vec<R::Record>, DecodeError> {
    values.into_iter().map(decode_record::<R>).collect()
}

pub fn encode_draft<R: Resource>(draft: &R::Draft) -> Result<Value, TransportError> {
    serde_json::to_value(draft)
        .map_err(|e| TransportError::connection(format!("failed to encode draft: {e}")))
}
