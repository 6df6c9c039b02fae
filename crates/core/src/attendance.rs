//! Attendance marking rules.

use crate::error::CoreError;
use crate::types::{string_enum, Timestamp};

string_enum! {
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
    }
}

/// `present` and `late` marks need a check-in time; `absent` must not
/// carry one.
pub fn validate_mark(
    status: AttendanceStatus,
    check_in_time: Option<Timestamp>,
) -> Result<(), CoreError> {
    match (status, check_in_time) {
        (AttendanceStatus::Present | AttendanceStatus::Late, None) => {
            Err(CoreError::validation(format!(
                "Check-in time is required when marking an employee {status}",
            )))
        }
        (AttendanceStatus::Absent, Some(_)) => Err(CoreError::validation(
            "An absent mark cannot have a check-in time",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_requires_check_in() {
        assert!(validate_mark(AttendanceStatus::Present, None).is_err());
        assert!(validate_mark(AttendanceStatus::Present, Some(chrono::Utc::now())).is_ok());
    }

    #[test]
    fn absent_and_late_marks() {
        assert!(validate_mark(AttendanceStatus::Absent, None).is_ok());
        assert!(validate_mark(AttendanceStatus::Absent, Some(chrono::Utc::now())).is_err());
        assert!(validate_mark(AttendanceStatus::Late, None).is_err());
        assert!(validate_mark(AttendanceStatus::Late, Some(chrono::Utc::now())).is_ok());
    }
}
