//! Reporting for multi-file uploads.
//!
//! An upload is accepted or rejected per file. Partial success is reported as a count and never
//! rolled back.

use crate::notify::Notification;
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BulkReport {
    pub success_count: usize,
    pub total_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BulkReport {
    pub fn is_complete(&self) -> bool {
        self.success_count == self.total_count
    }

    pub fn notification(&self) -> Notification {
        let message = format!(
            "{} of {} file(s) uploaded successfully",
            self.success_count, self.total_count
        );
        if self.is_complete() {
            Notification::success(message)
        } else if self.success_count == 0 {
            Notification::error(message)
        } else {
            Notification::warning(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;

    #[test]
    fn partial_upload_is_a_warning_with_counts() {
        let report: BulkReport = serde_json::from_str(
            r#"{"success_count": 2, "total_count": 3, "errors": ["scan.exe: type not allowed"]}"#,
        )
        .unwrap();
        let n = report.notification();
        assert_eq!(n.severity, Severity::Warning);
        assert_eq!(n.message, "2 of 3 file(s) uploaded successfully");
    }

    #[test]
    fn complete_and_failed_uploads() {
        let all = BulkReport {
            success_count: 3,
            total_count: 3,
            errors: vec![],
        };
        assert_eq!(all.notification().severity, Severity::Success);

        let none = BulkReport {
            success_count: 0,
            total_count: 2,
            errors: vec![],
        };
        assert_eq!(none.notification().severity, Severity::Error);
    }
}
