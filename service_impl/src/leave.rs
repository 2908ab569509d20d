use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use dao::attendance::AttendanceDao;
use dao::leave_request::LeaveRequestDao;
use dao::TransactionDao;
use service::clock::ClockService;
use service::leave::{ApprovalStatus, LeaveRequest, LeaveService};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::uuid_service::UuidService;
use service::{PermissionService, ServiceError, ValidationFailureItem};
use tracing::info;
use uuid::Uuid;

use crate::permission::check_self_or_admin;

const LEAVE_SERVICE_PROCESS: &str = "leave-service";

pub trait LeaveServiceDeps {
    type Context: Clone + PartialEq + Eq + std::fmt::Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;
    type LeaveRequestDao: LeaveRequestDao<Transaction = Self::Transaction> + Send + Sync;
    type AttendanceDao: AttendanceDao<Transaction = Self::Transaction> + Send + Sync;
    type PermissionService: PermissionService<Context = Self::Context> + Send + Sync;
    type ClockService: ClockService + Send + Sync;
    type UuidService: UuidService + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct LeaveServiceImpl<Deps: LeaveServiceDeps> {
    pub leave_request_dao: Arc<Deps::LeaveRequestDao>,
    pub attendance_dao: Arc<Deps::AttendanceDao>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub clock_service: Arc<Deps::ClockService>,
    pub uuid_service: Arc<Deps::UuidService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

#[async_trait]
impl<Deps: LeaveServiceDeps> LeaveService for LeaveServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let leave = self
            .leave_request_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|leave| leave.deleted.is_none())
            .as_ref()
            .map(LeaveRequest::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        check_self_or_admin(self.permission_service.as_ref(), leave.employee_id, context).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(leave)
    }

    async fn get_for_employee(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?;
        let leaves = self
            .leave_request_dao
            .find_by_employee_id(employee_id, tx.clone())
            .await?
            .iter()
            .map(LeaveRequest::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(leaves)
    }

    async fn get_overlapping_span(
        &self,
        span: DateSpan,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let leaves = self
            .leave_request_dao
            .find_overlapping_span(span, tx.clone())
            .await?
            .iter()
            .map(LeaveRequest::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(leaves)
    }

    async fn create(
        &self,
        leave: &LeaveRequest,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), leave.employee_id, context).await?;

        if leave.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if leave.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if leave.created.is_some() {
            return Err(ServiceError::CreatedSetOnCreate);
        }
        if leave.deleted.is_some() {
            return Err(ServiceError::DeletedSetOnCreate);
        }
        if leave.end_date < leave.start_date {
            return Err(ServiceError::DateOrderWrong(leave.start_date, leave.end_date));
        }

        let mut validation = Vec::with_capacity(4);
        if leave.reason.trim().is_empty() {
            validation.push(ValidationFailureItem::InvalidValue("reason".into()));
        }
        if leave.approval != ApprovalStatus::Pending {
            validation.push(ValidationFailureItem::InvalidValue("approval".into()));
        }
        if !validation.is_empty() {
            return Err(ServiceError::ValidationError(validation.into()));
        }

        let span = leave
            .span()
            .ok_or(ServiceError::DateOrderWrong(leave.start_date, leave.end_date))?;
        let attended = self
            .attendance_dao
            .find_by_employee_in_span(leave.employee_id, span, tx.clone())
            .await?;
        if !attended.is_empty() {
            return Err(ServiceError::LeaveConflictsWithAttendance);
        }

        let new_leave = LeaveRequest {
            id: self.uuid_service.new_uuid("LeaveService::create id"),
            version: self.uuid_service.new_uuid("LeaveService::create version"),
            created: Some(self.clock_service.now_utc()),
            ..leave.clone()
        };
        self.leave_request_dao
            .create(&(&new_leave).try_into()?, LEAVE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(new_leave)
    }

    async fn decide(
        &self,
        id: Uuid,
        approval: ApprovalStatus,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        if approval == ApprovalStatus::Pending {
            return Err(ServiceError::ValidationError(
                [ValidationFailureItem::InvalidValue("approval".into())].into(),
            ));
        }

        let mut entity = self
            .leave_request_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|entity| entity.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.approval = (&approval).into();
        entity.version = self.uuid_service.new_uuid("LeaveService::decide version");
        info!(leave = %id, ?approval, "Deciding leave request");
        self.leave_request_dao
            .update(&entity, LEAVE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok((&entity).into())
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
            .leave_request_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|entity| entity.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.deleted = Some(self.clock_service.now_utc());
        entity.version = self.uuid_service.new_uuid("LeaveService::delete version");
        self.leave_request_dao
            .update(&entity, LEAVE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
