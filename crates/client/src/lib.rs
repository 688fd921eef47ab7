//! # deskhub Client
//!
//! `reqwest` implementation of the seams `deskhub-core` leaves open:
//! - [`ResourceApi`](deskhub_core::ResourceApi): list, create, update and delete against
//!   `{api_url}/{domain}/{collection}`
//! - [`AuthApi`](deskhub_core::session::AuthApi): `/auth/login` and `/auth/verify`
//! - [`Geocoder`](deskhub_core::debounce::Geocoder): `/property/geocode`
//! - multi-file upload to `/cloud/upload`, reported as a
//!   [`BulkReport`](deskhub_core::bulk::BulkReport)
//!
//! One [`HttpClient`] serves all of them. It reads the bearer token from its credential store on
//! every request, so a login or logout elsewhere takes effect on the next call.

mod auth;
mod client;
mod geocode;
mod resource;
mod response;
mod upload;

#[cfg(test)]
mod mock;

pub use client::{ClientError, ClientResult, HttpClient};
pub use upload::{UploadError, UploadFile};
