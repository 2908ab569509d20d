use dao::attendance::{AttendanceEntity, AttendanceStatusEntity, MockAttendanceDao};
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestEntity, MockLeaveRequestDao};
use dao::{DaoError, MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::attendance::{AttendanceService, AttendanceStatus};
use service::clock::MockClockService;
use service::config::{Config, MockConfigService};
use service::employee::{Employee, MockEmployeeService, Role};
use service::permission::Authentication;
use service::schedule::{MockWorkScheduleService, WorkSchedule};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ServiceError};
use attendance_utils::TimeOfDay;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};
use uuid::{uuid, Uuid};

use crate::attendance::{AttendanceServiceDeps, AttendanceServiceImpl};
use crate::test::error_test::*;

pub fn default_employee_id() -> Uuid {
    uuid!("3A9F54F8-2C18-4A1B-9D05-6E4C2E6C1D10")
}
pub fn alternate_employee_id() -> Uuid {
    uuid!("3A9F54F8-2C18-4A1B-9D05-6E4C2E6C1D11")
}
pub fn default_schedule_id() -> Uuid {
    uuid!("7C0B8B9E-5B9C-4F6B-8D80-1B2F4B7C9A20")
}
pub fn default_entry_id() -> Uuid {
    uuid!("D4E1A7C2-9F30-4DF2-BD52-8A1C5E9B3F30")
}
pub fn default_leave_id() -> Uuid {
    uuid!("B5F2C8D3-0A41-4E03-CE63-9B2D6F0C4A40")
}
pub fn default_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50")
}
pub fn alternate_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51")
}

pub fn today() -> Date {
    date!(2026 - 02 - 02)
}

pub fn default_schedule() -> WorkSchedule {
    WorkSchedule {
        id: default_schedule_id(),
        name: "Office hours".into(),
        start_of_work: TimeOfDay::new(8, 0).unwrap(),
        late_threshold: TimeOfDay::new(8, 15).unwrap(),
        end_of_work: TimeOfDay::new(17, 0).unwrap(),
        created: Some(generate_default_now()),
        deleted: None,
        version: Uuid::nil(),
    }
}

pub fn default_employee() -> Employee {
    Employee {
        id: default_employee_id(),
        name: "Default Employee".into(),
        role: Role::Staff,
        custom_start_of_work: None,
        custom_end_of_work: None,
        schedule_id: Some(default_schedule_id()),
        created: Some(generate_default_now()),
        deleted: None,
        version: Uuid::nil(),
    }
}

/// Entity written by a check-in at 08:20 local against the default schedule.
pub fn open_attendance_entity() -> AttendanceEntity {
    AttendanceEntity {
        id: default_entry_id(),
        employee_id: default_employee_id(),
        date: today(),
        check_in: Some(generate_default_now()),
        check_out: None,
        status: AttendanceStatusEntity::Late,
        early_leave: None,
        late_minutes: 5,
        // 08:20 until the scheduled 17:00 end.
        worked_hours: 8.6667,
        schedule_id: default_schedule_id(),
        created: generate_default_now(),
        deleted: None,
        version: default_version(),
    }
}

pub fn leave_entity(approval: ApprovalStatusEntity) -> LeaveRequestEntity {
    LeaveRequestEntity {
        id: default_leave_id(),
        employee_id: default_employee_id(),
        start_date: today(),
        end_date: today(),
        reason: "Family matters".into(),
        document_path: None,
        approval,
        created: generate_default_now(),
        deleted: None,
        version: default_version(),
    }
}

pub struct AttendanceServiceDependencies {
    pub attendance_dao: MockAttendanceDao,
    pub leave_request_dao: MockLeaveRequestDao,
    pub employee_service: MockEmployeeService,
    pub work_schedule_service: MockWorkScheduleService,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
    pub config_service: MockConfigService,
    pub transaction_dao: MockTransactionDao,
}

impl AttendanceServiceDeps for AttendanceServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type AttendanceDao = MockAttendanceDao;
    type LeaveRequestDao = MockLeaveRequestDao;
    type EmployeeService = MockEmployeeService;
    type WorkScheduleService = MockWorkScheduleService;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type ConfigService = MockConfigService;
    type TransactionDao = MockTransactionDao;
}

impl AttendanceServiceDependencies {
    pub fn build_service(self) -> AttendanceServiceImpl<AttendanceServiceDependencies> {
        AttendanceServiceImpl {
            attendance_dao: self.attendance_dao.into(),
            leave_request_dao: self.leave_request_dao.into(),
            employee_service: self.employee_service.into(),
            work_schedule_service: self.work_schedule_service.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            config_service: self.config_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

pub fn build_dependencies_at(
    permission: bool,
    privilege: &'static str,
    now: OffsetDateTime,
) -> AttendanceServiceDependencies {
    let attendance_dao = MockAttendanceDao::new();
    let leave_request_dao = MockLeaveRequestDao::new();
    let employee_service = MockEmployeeService::new();
    let work_schedule_service = MockWorkScheduleService::new();

    let mut permission_service = MockPermissionService::new();
    permission_service
        .expect_check_permission()
        .with(eq(privilege), eq(().auth()))
        .returning(move |_, _| {
            if permission {
                Ok(())
            } else {
                Err(ServiceError::Forbidden)
            }
        });
    permission_service
        .expect_check_permission()
        .returning(|_, _| Err(ServiceError::Forbidden));
    permission_service
        .expect_current_employee_id()
        .returning(|_| Ok(Some(default_employee_id())));

    let mut clock_service = MockClockService::new();
    clock_service.expect_now_utc().returning(move || now);

    let uuid_service = MockUuidService::new();

    let mut config_service = MockConfigService::new();
    config_service.expect_get_config().returning(|| {
        Ok(Config {
            timezone: "Asia/Jakarta".into(),
        })
    });

    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    AttendanceServiceDependencies {
        attendance_dao,
        leave_request_dao,
        employee_service,
        work_schedule_service,
        permission_service,
        clock_service,
        uuid_service,
        config_service,
        transaction_dao,
    }
}

pub fn build_dependencies(permission: bool, privilege: &'static str) -> AttendanceServiceDependencies {
    build_dependencies_at(permission, privilege, generate_default_now())
}

/// Wire the mocks every successful check-in needs: no existing entry, no
/// blocking leave, the default employee and schedule.
fn expect_open_day(deps: &mut AttendanceServiceDependencies) {
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .with(eq(default_employee_id()), eq(today()), always())
        .returning(|_, _, _| Ok(None));
    deps.leave_request_dao
        .expect_find_by_employee_overlapping_span()
        .returning(|_, _, _| Ok([].into()));
    deps.employee_service
        .expect_get()
        .with(eq(default_employee_id()), eq(Authentication::Full), always())
        .returning(|_, _, _| Ok(default_employee()));
    deps.work_schedule_service
        .expect_get()
        .with(eq(default_schedule_id()), always(), always())
        .returning(|_, _, _| Ok(default_schedule()));
}

fn expect_check_in_uuids(deps: &mut AttendanceServiceDependencies) {
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("AttendanceService::check_in id"))
        .returning(|_| default_entry_id());
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("AttendanceService::check_in version"))
        .returning(|_| default_version());
}

#[tokio::test]
async fn test_check_in_late() {
    let mut deps = build_dependencies(true, "staff");
    expect_open_day(&mut deps);
    expect_check_in_uuids(&mut deps);
    deps.attendance_dao
        .expect_create()
        .with(eq(open_attendance_entity()), eq("attendance-service"), always())
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(result.is_ok());
    let entry = result.unwrap();
    assert_eq!(entry.status, AttendanceStatus::Late);
    assert_eq!(entry.late_minutes, 5);
    assert_eq!(entry.date, today());
    assert_eq!(entry.check_in, Some(generate_default_now()));
    assert_eq!(entry.check_out, None);
    assert_eq!(entry.worked_hours, 8.6667);
}

#[tokio::test]
async fn test_check_in_on_time_within_grace_window() {
    // 08:10 local: after start, before the 08:15 threshold.
    let now = datetime!(2026-02-02 01:10:00 UTC);
    let mut deps = build_dependencies_at(true, "staff", now);
    expect_open_day(&mut deps);
    expect_check_in_uuids(&mut deps);
    deps.attendance_dao.expect_create().returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(result.is_ok());
    let entry = result.unwrap();
    assert_eq!(entry.status, AttendanceStatus::Present);
    assert_eq!(entry.late_minutes, 0);
    assert_eq!(entry.worked_hours, 8.8333);
}

#[tokio::test]
async fn test_check_in_exactly_at_start_of_work() {
    let now = datetime!(2026-02-02 01:00:00 UTC);
    let mut deps = build_dependencies_at(true, "staff", now);
    expect_open_day(&mut deps);
    expect_check_in_uuids(&mut deps);
    deps.attendance_dao.expect_create().returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(result.is_ok());
    let entry = result.unwrap();
    assert_eq!(entry.status, AttendanceStatus::Present);
    assert_eq!(entry.worked_hours, 9.0);
}

#[tokio::test]
async fn test_check_in_too_early() {
    // 07:59 local, one minute before the scheduled start.
    let now = datetime!(2026-02-02 00:59:00 UTC);
    let mut deps = build_dependencies_at(true, "staff", now);
    expect_open_day(&mut deps);
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    if let Err(ServiceError::TooEarlyToCheckIn(start)) = result {
        assert_eq!(start, TimeOfDay::new(8, 0).unwrap());
    } else {
        panic!("Expected too early to check in error");
    }
}

#[tokio::test]
async fn test_check_in_twice_fails() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(Some(open_attendance_entity())));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(matches!(result, Err(ServiceError::AlreadyCheckedInToday)));
}

#[tokio::test]
async fn test_check_in_blocked_by_pending_leave() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(None));
    deps.leave_request_dao
        .expect_find_by_employee_overlapping_span()
        .returning(|_, _, _| Ok([leave_entity(ApprovalStatusEntity::Pending)].into()));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(matches!(
        result,
        Err(ServiceError::AlreadyOnApprovedLeaveToday)
    ));
}

#[tokio::test]
async fn test_check_in_not_blocked_by_rejected_leave() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(None));
    deps.leave_request_dao
        .expect_find_by_employee_overlapping_span()
        .returning(|_, _, _| Ok([leave_entity(ApprovalStatusEntity::Rejected)].into()));
    deps.employee_service
        .expect_get()
        .returning(|_, _, _| Ok(default_employee()));
    deps.work_schedule_service
        .expect_get()
        .returning(|_, _, _| Ok(default_schedule()));
    expect_check_in_uuids(&mut deps);
    deps.attendance_dao.expect_create().returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_check_in_race_loser_sees_already_checked_in() {
    let mut deps = build_dependencies(true, "staff");
    expect_open_day(&mut deps);
    expect_check_in_uuids(&mut deps);
    deps.attendance_dao
        .expect_create()
        .returning(|_, _, _| Err(DaoError::UniqueViolation));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(matches!(result, Err(ServiceError::AlreadyCheckedInToday)));
}

#[tokio::test]
async fn test_check_in_no_resolvable_schedule() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(None));
    deps.leave_request_dao
        .expect_find_by_employee_overlapping_span()
        .returning(|_, _, _| Ok([].into()));
    deps.employee_service.expect_get().returning(|_, _, _| {
        Ok(Employee {
            schedule_id: None,
            ..default_employee()
        })
    });
    deps.work_schedule_service
        .expect_get_default()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    assert!(matches!(result, Err(ServiceError::ScheduleNotFound)));
}

#[tokio::test]
async fn test_check_in_no_permission() {
    let deps = build_dependencies(false, "staff");
    let service = deps.build_service();
    let result = service.check_in(default_employee_id(), ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_check_in_for_other_employee_forbidden() {
    let deps = build_dependencies(true, "staff");
    let service = deps.build_service();
    let result = service
        .check_in(alternate_employee_id(), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_check_out_after_scheduled_end() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .with(eq(default_employee_id()), eq(today()), always())
        .returning(|_, _, _| Ok(Some(open_attendance_entity())));
    deps.work_schedule_service
        .expect_get()
        .with(eq(default_schedule_id()), always(), always())
        .returning(|_, _, _| Ok(default_schedule()));
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("AttendanceService::check_out version"))
        .returning(|_| alternate_version());
    // 17:30 local: 9h10m after the 08:20 check-in.
    let check_out = datetime!(2026-02-02 10:30:00 UTC);
    deps.attendance_dao
        .expect_update()
        .with(
            eq(AttendanceEntity {
                check_out: Some(check_out),
                early_leave: Some(false),
                worked_hours: 9.1667,
                version: alternate_version(),
                ..open_attendance_entity()
            }),
            eq("attendance-service"),
            always(),
        )
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service
        .check_out(default_employee_id(), check_out, ().auth(), None)
        .await;
    assert!(result.is_ok());
    let entry = result.unwrap();
    assert_eq!(entry.worked_hours, 9.1667);
    assert_eq!(entry.early_leave, Some(false));
    // Lateness stays untouched by check-out.
    assert_eq!(entry.late_minutes, 5);
}

#[tokio::test]
async fn test_check_out_before_scheduled_end_flags_early_leave() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(Some(open_attendance_entity())));
    deps.work_schedule_service
        .expect_get()
        .returning(|_, _, _| Ok(default_schedule()));
    deps.uuid_service
        .expect_new_uuid()
        .returning(|_| alternate_version());
    deps.attendance_dao.expect_update().returning(|_, _, _| Ok(()));
    // 16:00 local, an hour before the scheduled end.
    let check_out = datetime!(2026-02-02 09:00:00 UTC);
    let service = deps.build_service();
    let result = service
        .check_out(default_employee_id(), check_out, ().auth(), None)
        .await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().early_leave, Some(true));
}

#[tokio::test]
async fn test_check_out_without_check_in() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| Ok(None));
    let service = deps.build_service();
    let result = service
        .check_out(
            default_employee_id(),
            datetime!(2026-02-02 10:30:00 UTC),
            ().auth(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NoCheckInToday)));
}

#[tokio::test]
async fn test_check_out_twice_fails() {
    let mut deps = build_dependencies(true, "staff");
    deps.attendance_dao
        .expect_find_by_employee_and_date()
        .returning(|_, _, _| {
            Ok(Some(AttendanceEntity {
                check_out: Some(datetime!(2026-02-02 09:00:00 UTC)),
                ..open_attendance_entity()
            }))
        });
    let service = deps.build_service();
    let result = service
        .check_out(
            default_employee_id(),
            datetime!(2026-02-02 10:30:00 UTC),
            ().auth(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NoCheckInToday)));
}

#[tokio::test]
async fn test_delete() {
    let mut deps = build_dependencies(true, "admin");
    deps.attendance_dao
        .expect_find_by_id()
        .with(eq(default_entry_id()), always())
        .returning(|_, _| Ok(Some(open_attendance_entity())));
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("AttendanceService::delete version"))
        .returning(|_| alternate_version());
    deps.attendance_dao
        .expect_update()
        .with(
            eq(AttendanceEntity {
                deleted: Some(generate_default_now()),
                version: alternate_version(),
                ..open_attendance_entity()
            }),
            eq("attendance-service"),
            always(),
        )
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.delete(default_entry_id(), ().auth(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_not_found() {
    let mut deps = build_dependencies(true, "admin");
    deps.attendance_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service.delete(default_entry_id(), ().auth(), None).await;
    test_not_found(&result, &default_entry_id());
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let deps = build_dependencies(true, "staff");
    let service = deps.build_service();
    let result = service.delete(default_entry_id(), ().auth(), None).await;
    test_forbidden(&result);
}
