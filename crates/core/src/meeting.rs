//! Meeting scheduling rules and join-link generation.

use rand::Rng;

use crate::error::CoreError;
use crate::types::{string_enum, Timestamp};

string_enum! {
    pub enum MeetingStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Shortest meeting accepted, in minutes.
pub const MIN_DURATION_MINS: i32 = 1;

/// Default meeting length when none is given, in minutes.
pub const DEFAULT_DURATION_MINS: i32 = 30;

/// Check a new meeting: title present, start in the future, positive length,
/// at least one attendee.
pub fn validate_schedule(
    title: &str,
    date_time: Timestamp,
    duration_mins: i32,
    attendee_count: usize,
    now: Timestamp,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("Meeting title is required"));
    }
    if date_time <= now {
        return Err(CoreError::validation("Meeting must be scheduled in the future"));
    }
    if duration_mins < MIN_DURATION_MINS {
        return Err(CoreError::validation(format!(
            "Meeting duration must be at least {MIN_DURATION_MINS} minute"
        )));
    }
    if attendee_count == 0 {
        return Err(CoreError::validation("A meeting needs at least one attendee"));
    }
    Ok(())
}

/// `scheduled -> completed | cancelled`; both targets are terminal.
pub fn validate_status_transition(
    from: MeetingStatus,
    to: MeetingStatus,
) -> Result<(), CoreError> {
    match (from, to) {
        (MeetingStatus::Scheduled, MeetingStatus::Completed | MeetingStatus::Cancelled) => Ok(()),
        _ => Err(CoreError::validation(format!(
            "Invalid meeting transition: {from} -> {to}"
        ))),
    }
}

/// Derived end of the meeting.
pub fn end_time(date_time: Timestamp, duration_mins: i32) -> Timestamp {
    date_time + chrono::Duration::minutes(i64::from(duration_mins))
}

/// Generate an opaque join link such as `https://meet.example/abc-defg-hij`.
pub fn generate_meeting_link(base_url: &str) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    let mut segment = |len: usize| -> String {
        (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    };
    let code = format!("{}-{}-{}", segment(3), segment(4), segment(3));
    format!("{}/{code}", base_url.trim_end_matches('/'))
}
