use crate::{
    commands::maintenance_requests::{
        CreateMaintenanceRequestCommand, DeleteMaintenanceRequestCommand,
        FinishMaintenanceCommand, StartMaintenanceCommand, UpdateMaintenanceRequestCommand,
    },
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    models::maintenance_request::{self, RequestStatus},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use std::sync::Arc;
use tracing::instrument;

/// Service for managing maintenance requests through their lifecycle
#[derive(Clone)]
pub struct MaintenanceRequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MaintenanceRequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Opens a new request
    #[instrument(skip(self, command))]
    pub async fn create_request(
        &self,
        command: CreateMaintenanceRequestCommand,
    ) -> Result<maintenance_request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_request(
        &self,
        request_id: i32,
    ) -> Result<Option<maintenance_request::Model>, ServiceError> {
        let db = self.db_pool.as_ref();
        Ok(maintenance_request::Entity::find_by_id(request_id)
            .one(db)
            .await?)
    }

    /// Newest first, optionally narrowed to one status. Returns the page and
    /// the total number of matching requests.
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        page: u64,
        limit: u64,
        status: Option<RequestStatus>,
    ) -> Result<(Vec<maintenance_request::Model>, u64), ServiceError> {
        use maintenance_request::Column;

        let db = self.db_pool.as_ref();
        let mut query = maintenance_request::Entity::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        let total = query.clone().count(db).await?;
        let offset = page.saturating_sub(1).saturating_mul(limit);
        if offset >= total {
            return Ok((Vec::new(), total));
        }

        let requests = query
            .order_by_desc(Column::RequestDate)
            .order_by_desc(Column::RequestTime)
            .order_by_desc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;

        Ok((requests, total))
    }

    #[instrument(skip(self, command), fields(request_id = command.request_id))]
    pub async fn start_request(
        &self,
        command: StartMaintenanceCommand,
    ) -> Result<maintenance_request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(request_id = command.request_id))]
    pub async fn finish_request(
        &self,
        command: FinishMaintenanceCommand,
    ) -> Result<maintenance_request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(request_id = command.request_id))]
    pub async fn update_request(
        &self,
        command: UpdateMaintenanceRequestCommand,
    ) -> Result<maintenance_request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(request_id = command.request_id))]
    pub async fn delete_request(
        &self,
        command: DeleteMaintenanceRequestCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }
}
