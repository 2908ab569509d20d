use attendance_utils::TimeOfDay;
use dao::work_schedule::{MockWorkScheduleDao, WorkScheduleEntity};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::clock::MockClockService;
use service::schedule::{WorkSchedule, WorkScheduleService};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ServiceError, ValidationFailureItem};
use uuid::Uuid;

use crate::test::attendance::{
    alternate_version, default_schedule, default_schedule_id, default_version,
};
use crate::test::error_test::*;
use crate::work_schedule::{WorkScheduleServiceDeps, WorkScheduleServiceImpl};

fn default_schedule_entity() -> WorkScheduleEntity {
    WorkScheduleEntity {
        id: default_schedule_id(),
        name: "Office hours".into(),
        start_of_work: TimeOfDay::new(8, 0).unwrap(),
        late_threshold: TimeOfDay::new(8, 15).unwrap(),
        end_of_work: TimeOfDay::new(17, 0).unwrap(),
        created: generate_default_now(),
        deleted: None,
        version: Uuid::nil(),
    }
}

pub struct WorkScheduleServiceDependencies {
    pub work_schedule_dao: MockWorkScheduleDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
    pub transaction_dao: MockTransactionDao,
}

impl WorkScheduleServiceDeps for WorkScheduleServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type WorkScheduleDao = MockWorkScheduleDao;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}

impl WorkScheduleServiceDependencies {
    pub fn build_service(self) -> WorkScheduleServiceImpl<WorkScheduleServiceDependencies> {
        WorkScheduleServiceImpl {
            work_schedule_dao: self.work_schedule_dao.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

pub fn build_dependencies(
    permission: bool,
    privilege: &'static str,
) -> WorkScheduleServiceDependencies {
    let work_schedule_dao = MockWorkScheduleDao::new();

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

    let mut clock_service = MockClockService::new();
    clock_service
        .expect_now_utc()
        .returning(generate_default_now);

    let uuid_service = MockUuidService::new();

    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    WorkScheduleServiceDependencies {
        work_schedule_dao,
        permission_service,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_all_filters_deleted() {
    let mut deps = build_dependencies(true, "staff");
    deps.work_schedule_dao.expect_all().returning(|_| {
        Ok([
            default_schedule_entity(),
            WorkScheduleEntity {
                id: Uuid::new_v4(),
                deleted: Some(generate_default_now()),
                ..default_schedule_entity()
            },
        ]
        .into())
    });
    let service = deps.build_service();
    let result = service.all(().auth(), None).await;
    assert!(result.is_ok());
    let schedules = result.unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0], default_schedule());
}

#[tokio::test]
async fn test_get() {
    let mut deps = build_dependencies(true, "staff");
    deps.work_schedule_dao
        .expect_find_by_id()
        .with(eq(default_schedule_id()), always())
        .returning(|_, _| Ok(Some(default_schedule_entity())));
    let service = deps.build_service();
    let result = service.get(default_schedule_id(), ().auth(), None).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), default_schedule());
}

#[tokio::test]
async fn test_get_not_found() {
    let mut deps = build_dependencies(true, "staff");
    deps.work_schedule_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service.get(default_schedule_id(), ().auth(), None).await;
    test_not_found(&result, &default_schedule_id());
}

#[tokio::test]
async fn test_get_default() {
    let mut deps = build_dependencies(true, "staff");
    deps.work_schedule_dao
        .expect_find_default()
        .returning(|_| Ok(Some(default_schedule_entity())));
    let service = deps.build_service();
    let result = service.get_default(().auth(), None).await;
    assert_eq!(result.unwrap(), Some(default_schedule()));
}

#[tokio::test]
async fn test_create() {
    let mut deps = build_dependencies(true, "admin");
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("WorkScheduleService::create id"))
        .returning(|_| default_schedule_id());
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("WorkScheduleService::create version"))
        .returning(|_| default_version());
    deps.work_schedule_dao
        .expect_create()
        .with(
            eq(WorkScheduleEntity {
                version: default_version(),
                ..default_schedule_entity()
            }),
            eq("work-schedule-service"),
            always(),
        )
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                id: Uuid::nil(),
                version: Uuid::nil(),
                created: None,
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    assert!(result.is_ok());
    let schedule = result.unwrap();
    assert_eq!(schedule.id, default_schedule_id());
    assert_eq!(schedule.created, Some(generate_default_now()));
}

#[tokio::test]
async fn test_create_requires_admin() {
    let deps = build_dependencies(true, "staff");
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                id: Uuid::nil(),
                version: Uuid::nil(),
                created: None,
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_with_id() {
    let deps = build_dependencies(true, "admin");
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                version: Uuid::nil(),
                created: None,
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_id_error(&result);
}

#[tokio::test]
async fn test_create_with_version() {
    let deps = build_dependencies(true, "admin");
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                id: Uuid::nil(),
                created: None,
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_version_error(&result);
}

#[tokio::test]
async fn test_create_empty_name() {
    let deps = build_dependencies(true, "admin");
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                id: Uuid::nil(),
                version: Uuid::nil(),
                created: None,
                name: "".into(),
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(&result, &ValidationFailureItem::InvalidValue("name".into()), 1);
}

#[tokio::test]
async fn test_create_threshold_before_start() {
    let deps = build_dependencies(true, "admin");
    let service = deps.build_service();
    let result = service
        .create(
            &WorkSchedule {
                id: Uuid::nil(),
                version: Uuid::nil(),
                created: None,
                late_threshold: TimeOfDay::new(7, 30).unwrap(),
                ..default_schedule()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("late_threshold".into()),
        1,
    );
}

#[tokio::test]
async fn test_update_not_found() {
    let mut deps = build_dependencies(true, "admin");
    deps.work_schedule_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service.update(&default_schedule(), ().auth(), None).await;
    test_not_found(&result, &default_schedule_id());
}

#[tokio::test]
async fn test_delete() {
    let mut deps = build_dependencies(true, "admin");
    deps.work_schedule_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_schedule_entity())));
    deps.uuid_service
        .expect_new_uuid()
        .with(eq("WorkScheduleService::delete version"))
        .returning(|_| alternate_version());
    deps.work_schedule_dao
        .expect_update()
        .with(
            eq(WorkScheduleEntity {
                deleted: Some(generate_default_now()),
                version: alternate_version(),
                ..default_schedule_entity()
            }),
            eq("work-schedule-service"),
            always(),
        )
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service.delete(default_schedule_id(), ().auth(), None).await;
    assert!(result.is_ok());
}
