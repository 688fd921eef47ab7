//! # deskhub Core
//!
//! Client-side synchronization logic shared by the dental clinic, property management and
//! supply-chain front ends.
//!
//! This crate contains the state and rules behind every CRUD screen:
//! - Resource collections, drafts and the one-draft-per-dialog slot
//! - The mutation-reload cycle with its loading flag and notification contract
//! - Name and address composition
//! - The debounced geocoding controller
//! - The authentication session and persisted credential
//!
//! **No HTTP**: the data-access layer is the [`ResourceApi`] trait; `deskhub-client` implements it
//! with `reqwest`. Views (or the CLI) construct controllers and drive them.

pub mod api;
pub mod bulk;
pub mod collection;
pub mod compose;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod folders;
pub mod loader;
pub mod notify;
pub mod outcome;
pub mod session;
pub mod sync;

pub use api::{Identified, ListQuery, Resource, ResourceApi, ResourcePath};
pub use collection::ResourceCollection;
pub use config::{ClientConfig, SyncMode};
pub use draft::{Dialog, DialogMode, Draft};
pub use error::{
    LookupError, MutationError, PreconditionError, SessionError, TransportError, ValidationError,
};
pub use notify::{Notification, Notifier, Severity};
pub use outcome::{DeleteOutcome, LoadingFlag, OperationOutcome};
pub use sync::{CollectionController, Confirm, SubmitError};

pub use deskhub_types::{NonEmptyText, RecordId};
