//! Task lifecycle: progress status (assignee-driven) and approval status
//! (assigner-driven), plus submission format checks.

use crate::error::CoreError;
use crate::types::string_enum;

string_enum! {
    /// Work progress, advanced only by the assignee.
    pub enum TaskStatus {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

string_enum! {
    /// Review outcome, set only by the assigner once the task is completed.
    pub enum ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

string_enum! {
    pub enum Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }
}

/// Maximum title length accepted on creation.
pub const MAX_TITLE_LEN: usize = 200;

/// Check the fields required to create a task.
pub fn validate_new_task(title: &str) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::validation("Task title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::validation(format!(
            "Task title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Progress only moves forward: pending -> in-progress -> completed.
pub fn validate_status_transition(from: TaskStatus, to: TaskStatus) -> Result<(), CoreError> {
    if to.rank() > from.rank() {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Invalid task transition: {from} -> {to}"
        )))
    }
}

/// An approval decision is only possible on a completed, still-pending task.
pub fn validate_approval(
    status: TaskStatus,
    current: ApprovalStatus,
    decision: ApprovalStatus,
) -> Result<(), CoreError> {
    if decision == ApprovalStatus::Pending {
        return Err(CoreError::validation(
            "Approval decision must be 'approved' or 'rejected'",
        ));
    }
    if status != TaskStatus::Completed {
        return Err(CoreError::validation(
            "Only completed tasks can be approved or rejected",
        ));
    }
    if current != ApprovalStatus::Pending {
        return Err(CoreError::validation(format!(
            "Task has already been {current}"
        )));
    }
    Ok(())
}

/// Normalize a list of allowed document formats: trimmed, lowercase, no
/// leading dot, de-duplicated, in first-seen order.
pub fn normalize_formats<I, S>(formats: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for f in formats {
        let f = f.as_ref().trim().trim_start_matches('.').to_lowercase();
        if !f.is_empty() && !out.contains(&f) {
            out.push(f);
        }
    }
    out
}

/// A submission's declared document type must be one of the task's
/// allowed formats. An empty allow-list accepts any type.
pub fn validate_submission_format(allowed: &[String], document_type: &str) -> Result<(), CoreError> {
    if allowed.is_empty() {
        return Ok(());
    }
    let declared = normalize_formats([document_type]);
    match declared.first() {
        Some(d) if allowed.contains(d) => Ok(()),
        _ => Err(CoreError::validation(format!(
            "Document type '{document_type}' is not allowed. Must be one of: {}",
            allowed.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn title_is_required() {
        assert!(validate_new_task("Onboarding checklist").is_ok());
        assert!(validate_new_task("   ").is_err());
        assert!(validate_new_task(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn status_moves_forward_only() {
        use TaskStatus::*;
        assert!(validate_status_transition(Pending, InProgress).is_ok());
        assert!(validate_status_transition(InProgress, Completed).is_ok());
        assert!(validate_status_transition(Pending, Completed).is_ok());
        assert!(validate_status_transition(Completed, InProgress).is_err());
        assert!(validate_status_transition(InProgress, InProgress).is_err());
        assert!(validate_status_transition(Completed, Pending).is_err());
    }

    #[test]
    fn approval_requires_completion() {
        use ApprovalStatus as A;
        assert!(validate_approval(TaskStatus::InProgress, A::Pending, A::Approved).is_err());
        assert!(validate_approval(TaskStatus::Completed, A::Pending, A::Approved).is_ok());
        assert!(validate_approval(TaskStatus::Completed, A::Pending, A::Rejected).is_ok());
        assert!(validate_approval(TaskStatus::Completed, A::Approved, A::Rejected).is_err());
        assert!(validate_approval(TaskStatus::Completed, A::Pending, A::Pending).is_err());
    }

    #[test]
    fn formats_are_normalized() {
        assert_eq!(
            normalize_formats([".PDF", "docx", "pdf", " ", "png "]),
            vec!["pdf", "docx", "png"]
        );
    }

    #[test]
    fn submission_format_checked_against_allow_list() {
        let allowed = normalize_formats(["pdf", "docx"]);
        assert!(validate_submission_format(&allowed, "PDF").is_ok());
        assert!(validate_submission_format(&allowed, ".docx").is_ok());
        let err = validate_submission_format(&allowed, "exe").unwrap_err();
        assert!(err.to_string().contains("pdf, docx"));
        assert!(validate_submission_format(&[], "anything").is_ok());
    }
}
