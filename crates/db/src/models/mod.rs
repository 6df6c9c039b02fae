//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts (and an update DTO where the row is mutable)
//! - Conversions into the wire records from `hrflow_core::records`

pub mod attendance;
pub mod leave;
pub mod meeting;
pub mod message;
pub mod notification;
pub mod task;
pub mod user;

pub use attendance::{Attendance, CreateAttendance};
pub use leave::{CreateLeave, LeaveRequest};
pub use meeting::{CreateMeeting, Meeting};
pub use message::{CreateMessage, Message};
pub use notification::{CreateNotification, Notification};
pub use task::{CreateTask, Task, TaskProgress};
pub use user::{CreateUser, UpdateUser, User};
