//! Debounced lookups.
//!
//! [`Debouncer`] is a restartable timer: each [`schedule`](Debouncer::schedule) cancels the
//! pending task (if its timer has not elapsed yet) and arms a new one. Once a timer elapses its
//! task runs to completion; later schedules do not interrupt it.
//!
//! [`GeocodeController`] uses it to resolve an address into coordinates while the user types:
//!
//! ```text
//! Idle --change--> Pending --change--> Pending (timer re-armed)
//!                  Pending --elapsed--> InFlight --done--> Idle
//! ```
//!
//! Automatic lookups swallow errors. Manual lookups skip the timer and report them.

use crate::constants::{GEOCODE_COUNTRY, MISSING_ADDRESS_MESSAGE};
use crate::error::{LookupError, PreconditionError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A restartable one-shot timer.
///
/// Must be used from within a Tokio runtime. Dropping the debouncer cancels the pending timer.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cancel any pending timer and arm a new one that runs `task` once `window` elapses.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let window = self.window;

        tokio::spawn(async move {
            let elapsed = tokio::select! {
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(window) => true,
            };
            if elapsed {
                task.await;
            }
        });
    }

    /// Cancel the pending timer, if any. A task whose timer already elapsed keeps running.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// An address as sent to the geocoding endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AddressQuery {
    pub address: String,
    pub city: String,
    pub province: String,
    pub country: String,
}

impl AddressQuery {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            province: province.into(),
            country: GEOCODE_COUNTRY.to_owned(),
        }
    }

    /// Automatic lookups only fire once both address and city are filled in.
    fn qualifies_for_auto_lookup(&self) -> bool {
        !self.address.trim().is_empty() && !self.city.trim().is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// External address-to-coordinates lookup.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &AddressQuery) -> Result<Coordinates, LookupError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    Pending,
    InFlight,
}

#[derive(Debug, Default)]
struct LookupShared {
    generation: u64,
    pending: bool,
    in_flight: usize,
    coordinates: Option<Coordinates>,
}

fn lock(shared: &Mutex<LookupShared>) -> MutexGuard<'_, LookupShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the coordinates of one property form and keeps them in sync with its address fields.
pub struct GeocodeController<G: Geocoder + ?Sized> {
    geocoder: Arc<G>,
    debouncer: Debouncer,
    auto_lookup: bool,
    shared: Arc<Mutex<LookupShared>>,
}

impl<G: Geocoder + ?Sized + 'static> GeocodeController<G> {
    /// Controller for a new record: automatic lookup is on.
    pub fn for_new(geocoder: Arc<G>, window: Duration) -> Self {
        Self {
            geocoder,
            debouncer: Debouncer::new(window),
            auto_lookup: true,
            shared: Arc::new(Mutex::new(LookupShared::default())),
        }
    }

    /// Controller for an existing record.
    ///
    /// Known coordinates turn automatic lookup off so they are never overwritten by typing.
    pub fn for_existing(geocoder: Arc<G>, window: Duration, known: Option<Coordinates>) -> Self {
        let mut controller = Self::for_new(geocoder, window);
        controller.auto_lookup = known.is_none();
        lock(&controller.shared).coordinates = known;
        controller
    }

    pub fn auto_lookup(&self) -> bool {
        self.auto_lookup
    }

    /// Turning automatic lookup off also cancels a pending timer.
    pub fn set_auto_lookup(&mut self, enabled: bool) {
        self.auto_lookup = enabled;
        if !enabled {
            self.cancel_pending();
        }
    }

    pub fn state(&self) -> LookupState {
        let shared = lock(&self.shared);
        if shared.in_flight > 0 {
            LookupState::InFlight
        } else if shared.pending {
            LookupState::Pending
        } else {
            LookupState::Idle
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        lock(&self.shared).coordinates
    }

    /// Coordinates typed in by hand.
    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        lock(&self.shared).coordinates = coordinates;
    }

    /// React to an edit of the address, city or province field.
    ///
    /// Any pending timer is cancelled. A new one is armed only when automatic lookup is on and
    /// both address and city are non-blank. Must be called from within a Tokio runtime.
    pub fn on_address_change(&mut self, query: AddressQuery) {
        self.cancel_pending();
        if !self.auto_lookup || !query.qualifies_for_auto_lookup() {
            return;
        }

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.pending = true;
            shared.generation
        };
        let geocoder = self.geocoder.clone();
        let shared = self.shared.clone();

        self.debouncer.schedule(async move {
            {
                let mut state = lock(&shared);
                if state.generation == generation {
                    state.pending = false;
                }
                state.in_flight += 1;
            }

            let result = geocoder.geocode(&query).await;

            let mut state = lock(&shared);
            state.in_flight -= 1;
            match result {
                Ok(coordinates) => state.coordinates = Some(coordinates),
                Err(e) => tracing::debug!(error = %e, "automatic geocode failed"),
            }
        });
    }

    /// Look the address up immediately, bypassing the timer.
    ///
    /// Cancels a pending automatic lookup. Unlike the automatic path, errors are returned and
    /// existing coordinates are kept on failure.
    pub async fn lookup_now(&mut self, query: &AddressQuery) -> Result<Coordinates, LookupError> {
        self.cancel_pending();
        if query.address.trim().is_empty() {
            return Err(PreconditionError::new(MISSING_ADDRESS_MESSAGE).into());
        }

        lock(&self.shared).in_flight += 1;
        let result = self.geocoder.geocode(query).await;

        let mut shared = lock(&self.shared);
        shared.in_flight -= 1;
        if let Ok(coordinates) = result {
            shared.coordinates = Some(coordinates);
        }
        result
    }

    fn cancel_pending(&mut self) {
        self.debouncer.cancel();
        lock(&self.shared).pending = false;
    }
}
