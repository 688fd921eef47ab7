//! Constants used throughout the deskhub core crate.
//!
//! Defaults and user-facing message texts live here so the controllers, the CLI and the tests
//! agree on them.

use std::time::Duration;

/// Default REST API base URL when no explicit URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default location of the persisted bearer credential.
pub const DEFAULT_TOKEN_FILE: &str = ".deskhub/token";

/// Delay between the last qualifying keystroke and an automatic geocode lookup.
pub const GEOCODE_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Country sent with every geocode query.
pub const GEOCODE_COUNTRY: &str = "USA";

/// Generic message for failures without a structured server message.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to server";

/// Manual geocoding requires an address.
pub const MISSING_ADDRESS_MESSAGE: &str = "Please enter an address first";

/// Separator used when joining address parts.
pub const ADDRESS_SEPARATOR: &str = ", ";
