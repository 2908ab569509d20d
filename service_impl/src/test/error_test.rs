use service::{permission::Authentication, ServiceError, ValidationFailureItem};
use time::macros::datetime;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn test_forbidden<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::Forbidden) = result {
        // All good
    } else {
        panic!("Expected forbidden error");
    }
}

pub fn test_not_found<T>(result: &Result<T, ServiceError>, target_id: &Uuid) {
    if let Err(ServiceError::EntityNotFound(id)) = result {
        assert_eq!(
            id, target_id,
            "Expected entity {} not found but got {}",
            target_id, id
        );
    } else {
        panic!("Expected entity {} not found error", target_id);
    }
}

pub fn test_employee_not_found<T>(result: &Result<T, ServiceError>, target_id: &Uuid) {
    if let Err(ServiceError::EmployeeNotFound(id)) = result {
        assert_eq!(id, target_id);
    } else {
        panic!("Expected employee {} not found error", target_id);
    }
}

pub fn test_zero_id_error<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::IdSetOnCreate) = result {
    } else {
        panic!("Expected id set on create error");
    }
}

pub fn test_zero_version_error<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::VersionSetOnCreate) = result {
    } else {
        panic!("Expected version set on create error");
    }
}

pub fn test_date_order_wrong<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::DateOrderWrong(_from, _to)) = result {
    } else {
        panic!("Expected date order failure");
    }
}

pub fn test_validation_error<T>(
    result: &Result<T, ServiceError>,
    validation_failure: &ValidationFailureItem,
    fail_count: usize,
) {
    if let Err(ServiceError::ValidationError(validation_failure_items)) = result {
        if !validation_failure_items.contains(validation_failure) {
            panic!(
                "Validation failure not found: {:?} in {:?}",
                validation_failure, validation_failure_items
            );
        }
        assert_eq!(fail_count, validation_failure_items.len());
    } else {
        panic!("Expected validation error");
    }
}

/// 08:20 on a Monday morning in Jakarta (UTC+7).
pub fn generate_default_now() -> OffsetDateTime {
    datetime!(2026-02-02 01:20:00 UTC)
}

pub trait NoneTypeExt {
    fn auth(&self) -> Authentication<()>;
}
impl NoneTypeExt for () {
    fn auth(&self) -> Authentication<()> {
        Authentication::Context(())
    }
}
