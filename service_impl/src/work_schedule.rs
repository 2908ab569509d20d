use std::sync::Arc;

use async_trait::async_trait;
use dao::work_schedule::WorkScheduleDao;
use dao::TransactionDao;
use service::clock::ClockService;
use service::permission::{Authentication, ADMIN_PRIVILEGE, STAFF_PRIVILEGE};
use service::schedule::{WorkSchedule, WorkScheduleService};
use service::uuid_service::UuidService;
use service::{PermissionService, ServiceError, ValidationFailureItem};
use uuid::Uuid;

const WORK_SCHEDULE_SERVICE_PROCESS: &str = "work-schedule-service";

pub trait WorkScheduleServiceDeps {
    type Context: Clone + PartialEq + Eq + std::fmt::Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;
    type WorkScheduleDao: WorkScheduleDao<Transaction = Self::Transaction> + Send + Sync;
    type PermissionService: PermissionService<Context = Self::Context> + Send + Sync;
    type ClockService: ClockService + Send + Sync;
    type UuidService: UuidService + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct WorkScheduleServiceImpl<Deps: WorkScheduleServiceDeps> {
    pub work_schedule_dao: Arc<Deps::WorkScheduleDao>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub clock_service: Arc<Deps::ClockService>,
    pub uuid_service: Arc<Deps::UuidService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

fn validate(schedule: &WorkSchedule) -> Result<(), ServiceError> {
    let mut validation = Vec::with_capacity(4);
    if schedule.name.trim().is_empty() {
        validation.push(ValidationFailureItem::InvalidValue("name".into()));
    }
    if schedule.late_threshold < schedule.start_of_work {
        validation.push(ValidationFailureItem::InvalidValue("late_threshold".into()));
    }
    if !validation.is_empty() {
        return Err(ServiceError::ValidationError(validation.into()));
    }
    Ok(())
}

#[async_trait]
impl<Deps: WorkScheduleServiceDeps> WorkScheduleService for WorkScheduleServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WorkSchedule]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(STAFF_PRIVILEGE, context)
            .await?;
        let schedules = self
            .work_schedule_dao
            .all(tx.clone())
            .await?
            .iter()
            .filter(|schedule| schedule.deleted.is_none())
            .map(WorkSchedule::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(schedules)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(STAFF_PRIVILEGE, context)
            .await?;
        let schedule = self
            .work_schedule_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|schedule| schedule.deleted.is_none())
            .as_ref()
            .map(WorkSchedule::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(schedule)
    }

    async fn get_default(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WorkSchedule>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(STAFF_PRIVILEGE, context)
            .await?;
        let schedule = self
            .work_schedule_dao
            .find_default(tx.clone())
            .await?
            .as_ref()
            .map(WorkSchedule::from);
        self.transaction_dao.commit(tx).await?;
        Ok(schedule)
    }

    async fn create(
        &self,
        schedule: &WorkSchedule,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        if schedule.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if schedule.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if schedule.created.is_some() {
            return Err(ServiceError::CreatedSetOnCreate);
        }
        if schedule.deleted.is_some() {
            return Err(ServiceError::DeletedSetOnCreate);
        }
        validate(schedule)?;

        let new_schedule = WorkSchedule {
            id: self.uuid_service.new_uuid("WorkScheduleService::create id"),
            version: self
                .uuid_service
                .new_uuid("WorkScheduleService::create version"),
            created: Some(self.clock_service.now_utc()),
            ..schedule.clone()
        };
        self.work_schedule_dao
            .create(
                &(&new_schedule).try_into()?,
                WORK_SCHEDULE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(new_schedule)
    }

    async fn update(
        &self,
        schedule: &WorkSchedule,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        let existing = self
            .work_schedule_dao
            .find_by_id(schedule.id, tx.clone())
            .await?
            .filter(|existing| existing.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(schedule.id))?;
        validate(schedule)?;

        let updated = WorkSchedule {
            created: Some(existing.created),
            deleted: None,
            version: self
                .uuid_service
                .new_uuid("WorkScheduleService::update version"),
            ..schedule.clone()
        };
        self.work_schedule_dao
            .update(
                &(&updated).try_into()?,
                WORK_SCHEDULE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(updated)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        let mut entity = self
            .work_schedule_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|entity| entity.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.deleted = Some(self.clock_service.now_utc());
        entity.version = self
            .uuid_service
            .new_uuid("WorkScheduleService::delete version");
        self.work_schedule_dao
            .update(&entity, WORK_SCHEDULE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
