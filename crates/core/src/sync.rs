//! The mutation-reload cycle.
//!
//! A [`CollectionController`] owns one resource collection, its dialog slot and the loading
//! flag of the control that submits it. Every mutation follows the same contract:
//!
//! 1. local preconditions are checked; a failure warns and issues no request
//! 2. the loading flag is raised for the duration of the request
//! 3. on success the collection is brought up to date (a full reload by default), the dialog
//!    closes, its draft is dropped and a success notification is emitted
//! 4. on a validation failure the dialog and draft stay, the server message is shown inline and
//!    as a notification
//! 5. on a transport failure the same happens with a generic connection message
//!
//! The loading flag is cleared on every exit path. Nothing is retried.
//!
//! `submit` and `delete` take `&mut self`, so one controller cannot have two mutations in
//! flight. The flag is still exposed (see [`LoadingFlag`]) for views that render the control.

use crate::api::{
    decode_record, decode_records, encode_draft, Identified, ListQuery, Resource, ResourceApi,
};
use crate::collection::ResourceCollection;
use crate::config::SyncMode;
use crate::constants::CONNECTION_ERROR_MESSAGE;
use crate::draft::{Dialog, DialogMode};
use crate::error::{MutationError, PreconditionError, TransportError};
use crate::notify::{Notification, Notifier};
use crate::outcome::{DeleteOutcome, LoadingFlag, OperationOutcome};
use deskhub_types::RecordId;
use std::sync::Arc;

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Why a submit did not reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("no dialog is open")]
    NoActiveDraft,
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

pub struct CollectionController<R: Resource, A: ResourceApi + ?Sized> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    mode: SyncMode,
    query: ListQuery,
    collection: ResourceCollection<R::Record>,
    dialog: Dialog<R::Draft>,
    loading: LoadingFlag,
}

impl<R: Resource, A: ResourceApi + ?Sized> CollectionController<R, A> {
    /// A controller with an empty, unloaded collection. Call [`load`](Self::load) on mount.
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            mode: SyncMode::default(),
            query: ListQuery::default(),
            collection: ResourceCollection::new(),
            dialog: Dialog::default(),
            loading: LoadingFlag::new(),
        }
    }

    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// Filters sent with every list request (status filter, parent folder).
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = query;
        self
    }

    pub fn set_query(&mut self, query: ListQuery) {
        self.query = query;
    }

    pub fn collection(&self) -> &ResourceCollection<R::Record> {
        &self.collection
    }

    pub fn dialog(&self) -> &Dialog<R::Draft> {
        &self.dialog
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Fetch the full collection and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and an error notification is emitted.
    pub async fn load(&mut self) -> Result<usize, TransportError> {
        let result = self
            .api
            .list(&R::PATH, &self.query)
            .await
            .and_then(|values| decode_records::<R>(values).map_err(TransportError::from));

        match result {
            Ok(records) => {
                tracing::debug!(
                    resource = R::PATH.collection_key(),
                    count = records.len(),
                    "loaded collection"
                );
                self.collection.replace(records);
                Ok(self.collection.len())
            }
            Err(e) => {
                tracing::warn!(
                    resource = R::PATH.collection_key(),
                    error = %e,
                    "failed to load collection"
                );
                self.notifier
                    .notify(Notification::error(format!("Error loading {}", R::PATH.plural())));
                Err(e)
            }
        }
    }

    pub fn open_create(&mut self) -> &mut R::Draft {
        self.dialog.open_create()
    }

    /// Open the edit dialog for a record in the current snapshot.
    ///
    /// Returns `None` (and leaves the dialog untouched) if the id is not in the snapshot.
    pub fn open_edit(&mut self, id: &RecordId) -> Option<&mut R::Draft> {
        let seed = R::seed_draft(self.collection.get(id)?);
        Some(self.dialog.open_edit(id.clone(), seed))
    }

    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        self.dialog.draft_mut()
    }

    /// Discard the open draft without submitting it.
    pub fn close_dialog(&mut self) {
        self.dialog.close();
    }

    /// Submit the open draft as a create or update, depending on how the dialog was opened.
    pub async fn submit(&mut self) -> Result<OperationOutcome<R::Record>, SubmitError> {
        let draft = self.dialog.draft().ok_or(SubmitError::NoActiveDraft)?;

        if let Err(e) = R::check_draft(draft.fields()) {
            self.notifier.notify(Notification::warning(e.0.clone()));
            return Err(e.into());
        }

        let mode = draft.mode().clone();
        let body = encode_draft::<R>(draft.fields());

        let _guard = self.loading.begin();
        let result = match body {
            Err(e) => Err(MutationError::Transport(e)),
            Ok(body) => match &mode {
                DialogMode::Create => self.api.create(&R::PATH, body).await,
                DialogMode::Edit(id) => self.api.update(&R::PATH, id, body).await,
            },
        };

        let outcome = match result {
            Ok(returned) => {
                let record = returned.and_then(|value| match decode_record::<R>(value) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "mutation succeeded but returned record did not decode"
                        );
                        None
                    }
                });
                self.refresh_after_write(record.clone()).await;
                self.dialog.close();
                let verb = match mode {
                    DialogMode::Create => "created",
                    DialogMode::Edit(_) => "updated",
                };
                self.notifier
                    .notify(Notification::success(format!("{} {verb} successfully", R::LABEL)));
                OperationOutcome::Success(record)
            }
            Err(MutationError::Validation(e)) => {
                self.dialog.set_inline_error(e.message.clone());
                self.notifier.notify(Notification::error(e.message.clone()));
                OperationOutcome::ValidationFailed(e)
            }
            Err(MutationError::Transport(e)) => {
                tracing::warn!(resource = R::PATH.collection_key(), error = %e, "mutation failed");
                self.dialog.set_inline_error(CONNECTION_ERROR_MESSAGE);
                self.notifier
                    .notify(Notification::error(CONNECTION_ERROR_MESSAGE));
                OperationOutcome::TransportFailed(e)
            }
        };

        Ok(outcome)
    }

    /// Delete a record after the user confirms.
    ///
    /// A declined prompt issues no request. A failed request leaves the snapshot unchanged.
    pub async fn delete(&mut self, id: &RecordId, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(&R::delete_prompt()) {
            return DeleteOutcome::Cancelled;
        }

        let _guard = self.loading.begin();
        match self.api.delete(&R::PATH, id).await {
            Ok(()) => {
                match self.mode {
                    SyncMode::Reload => {
                        let _ = self.load().await;
                    }
                    SyncMode::Patch => {
                        self.collection.remove(id);
                    }
                }
                self.notifier
                    .notify(Notification::success(format!("{} deleted successfully", R::LABEL)));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(
                    resource = R::PATH.collection_key(),
                    %id,
                    error = %e,
                    "delete failed"
                );
                self.notifier.notify(Notification::error(format!(
                    "Error deleting {}",
                    R::LABEL.to_lowercase()
                )));
                DeleteOutcome::Failed(e)
            }
        }
    }

    async fn refresh_after_write(&mut self, record: Option<R::Record>) {
        match (self.mode, record) {
            (SyncMode::Patch, Some(record)) => {
                tracing::debug!(id = %record.id(), "patching collection");
                self.collection.upsert(record);
            }
            // A reload failure keeps the old snapshot and notifies on its own.
            _ => {
                let _ = self.load().await;
            }
        }
    }
}
