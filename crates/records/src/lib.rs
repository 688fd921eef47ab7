//! Typed records for the deskhub applications.
//!
//! Each module declares the records one application lists, the drafts its dialogs edit, and
//! the local checks a draft must pass before it is sent:
//!
//! - [`dental`]: patients, dentists, appointments, treatment plans
//! - [`property`]: properties, tenants, contracts
//! - [`supply`]: products, suppliers, purchase orders
//! - [`cloud`]: folders of the file browser
//!
//! Records are lenient on input (missing fields default) because the backends omit empty
//! columns. Drafts serialize every field so the backend sees the full form.

pub mod cloud;
pub mod dental;
pub mod property;
pub mod supply;

use deskhub_core::PreconditionError;

/// Fail with the first message whose field is blank.
///
/// Checks run in form order so the user is pointed at the earliest missing field.
pub(crate) fn require(checks: &[(&str, &str)]) -> Result<(), PreconditionError> {
    match checks.iter().find(|(value, _)| value.trim().is_empty()) {
        Some((_, message)) => Err(PreconditionError::new(*message)),
        None => Ok(()),
    }
}

/// `None` and blank strings both mean "not selected" for optional foreign keys.
pub(crate) fn selected(id: &Option<deskhub_types::RecordId>) -> &str {
    id.as_ref().map(|id| id.as_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_first_blank_field() {
        let err = require(&[("x", "first"), (" ", "second"), ("", "third")]).unwrap_err();
        assert_eq!(err.0, "second");
        assert!(require(&[("x", "first")]).is_ok());
    }
}
