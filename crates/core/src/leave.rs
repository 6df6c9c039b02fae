//! Leave request rules: date bounds, approver resolution, and the
//! one-shot decision.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::policy::Member;
use crate::roles::Role;
use crate::types::{string_enum, DbId};

string_enum! {
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// `start` may be today but not earlier, and must not come after `end`.
pub fn validate_leave_dates(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if start < today {
        return Err(CoreError::validation("Leave cannot start in the past"));
    }
    if end < start {
        return Err(CoreError::validation(
            "Leave end date must not be before the start date",
        ));
    }
    Ok(())
}

/// Reason text is required.
pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        Err(CoreError::validation("A reason for the leave is required"))
    } else {
        Ok(())
    }
}

/// Pick the approver id for a requester when none was given explicitly.
///
/// Employees apply to the hr that created them. HR accounts have no single
/// implicit approver, so `fallback_admin` (normally the oldest admin) is used.
pub fn default_approver(requester: &Member, fallback_admin: Option<DbId>) -> Option<DbId> {
    match requester.role {
        Role::Employee => requester.created_by,
        Role::Hr => requester.created_by.or(fallback_admin),
        Role::Admin => None,
    }
}

/// The approver must sit exactly one role above the requester. Employees
/// may only apply to the hr that manages them.
pub fn validate_approver(requester: &Member, approver: &Member) -> Result<(), CoreError> {
    let expected = requester.role.superior().ok_or_else(|| {
        CoreError::forbidden(format!("A {} cannot apply for leave", requester.role))
    })?;
    if approver.role != expected {
        return Err(CoreError::validation(format!(
            "Leave must be applied to a {expected} account"
        )));
    }
    if requester.role == Role::Employee && requester.created_by != Some(approver.id) {
        return Err(CoreError::validation(
            "Employees apply for leave to the hr account that manages them",
        ));
    }
    Ok(())
}

/// Only the designated approver, or an admin, may decide.
pub fn can_decide(actor: &Member, applied_to: DbId) -> Result<(), CoreError> {
    if actor.id == applied_to || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Only the designated approver may decide this leave request",
        ))
    }
}

/// A leave is decided exactly once, from pending to approved or rejected.
pub fn validate_decision(current: LeaveStatus, decision: LeaveStatus) -> Result<(), CoreError> {
    if decision == LeaveStatus::Pending {
        return Err(CoreError::validation(
            "Decision must be 'approved' or 'rejected'",
        ));
    }
    if current != LeaveStatus::Pending {
        return Err(CoreError::validation(format!(
            "Leave request has already been {current}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const ADMIN: Member = Member { id: 1, role: Role::Admin, created_by: None };
    const HR: Member = Member { id: 2, role: Role::Hr, created_by: Some(1) };
    const OTHER_HR: Member = Member { id: 3, role: Role::Hr, created_by: Some(1) };
    const EMP: Member = Member { id: 10, role: Role::Employee, created_by: Some(2) };

    #[test]
    fn start_today_is_accepted() {
        let today = day(2026, 3, 10);
        assert!(validate_leave_dates(today, today, today).is_ok());
        assert!(validate_leave_dates(today, day(2026, 3, 12), today).is_ok());
    }

    #[test]
    fn start_yesterday_is_rejected() {
        let today = day(2026, 3, 10);
        assert_matches!(
            validate_leave_dates(day(2026, 3, 9), today, today),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let today = day(2026, 3, 10);
        assert!(validate_leave_dates(day(2026, 3, 12), day(2026, 3, 11), today).is_err());
    }

    #[test]
    fn approver_chain() {
        assert!(validate_approver(&EMP, &HR).is_ok());
        assert!(validate_approver(&EMP, &OTHER_HR).is_err());
        assert!(validate_approver(&EMP, &ADMIN).is_err());
        assert!(validate_approver(&HR, &ADMIN).is_ok());
        assert!(validate_approver(&HR, &OTHER_HR).is_err());
        assert_matches!(validate_approver(&ADMIN, &ADMIN), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn default_approver_resolution() {
        assert_eq!(default_approver(&EMP, Some(1)), Some(2));
        assert_eq!(default_approver(&HR, None), Some(1));
        let orphan_hr = Member { id: 4, role: Role::Hr, created_by: None };
        assert_eq!(default_approver(&orphan_hr, Some(1)), Some(1));
        assert_eq!(default_approver(&ADMIN, Some(1)), None);
    }

    #[test]
    fn only_approver_or_admin_decides() {
        assert!(can_decide(&HR, 2).is_ok());
        assert!(can_decide(&ADMIN, 2).is_ok());
        assert_matches!(can_decide(&OTHER_HR, 2), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn decision_is_one_shot() {
        use LeaveStatus::*;
        assert!(validate_decision(Pending, Approved).is_ok());
        assert!(validate_decision(Pending, Rejected).is_ok());
        assert!(validate_decision(Approved, Rejected).is_err());
        assert!(validate_decision(Pending, Pending).is_err());
    }
}
