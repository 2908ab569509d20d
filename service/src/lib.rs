use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

pub mod attendance;
pub mod clock;
pub mod config;
pub mod employee;
pub mod leave;
pub mod permission;
pub mod recap;
pub mod schedule;
pub mod timeline;
pub mod uuid_service;

pub use permission::{
    Authentication, MockPermissionService, PermissionService, ADMIN_PRIVILEGE, STAFF_PRIVILEGE,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
    ModificationNotAllowed(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error")]
    InternalError,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error("No work schedule could be resolved")]
    ScheduleNotFound,

    #[error("Check-in opens at {0}")]
    TooEarlyToCheckIn(attendance_utils::TimeOfDay),

    #[error("An attendance entry for today already exists")]
    AlreadyCheckedInToday,

    #[error("An approved or pending leave already covers today")]
    AlreadyOnApprovedLeaveToday,

    #[error("No open check-in entry exists for today")]
    NoCheckInToday,

    #[error("Leave range overlaps an existing attendance day")]
    LeaveConflictsWithAttendance,

    #[error("Invalid recap period: month {0}")]
    InvalidPeriod(u8),

    #[error("Unknown timezone: {0}")]
    TimezoneNotFound(Arc<str>),

    #[error("Id must not be set on create")]
    IdSetOnCreate,

    #[error("Version must not be set on create")]
    VersionSetOnCreate,

    #[error("Created timestamp must not be set on create")]
    CreatedSetOnCreate,

    #[error("Deleted timestamp must not be set on create")]
    DeletedSetOnCreate,

    #[error("Date order wrong: {0} to {1}")]
    DateOrderWrong(time::Date, time::Date),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),
}
