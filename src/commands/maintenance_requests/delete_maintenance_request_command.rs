use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::maintenance_request,
};
use async_trait::async_trait;
use sea_orm::{EntityTrait, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::not_found;

#[derive(Debug, Clone)]
pub struct DeleteMaintenanceRequestCommand {
    pub request_id: i32,
    pub deleted_by: Uuid,
}

#[async_trait]
impl Command for DeleteMaintenanceRequestCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let request_id = self.request_id;

        db_pool
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    let result = maintenance_request::Entity::delete_by_id(request_id)
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Err(not_found(request_id));
                    }
                    Ok(())
                })
            })
            .await?;

        info!(request_id, deleted_by = %self.deleted_by, "Maintenance request deleted");

        event_sender
            .send_or_log(Event::MaintenanceRequestDeleted {
                request_id,
                deleted_by: self.deleted_by,
            })
            .await;

        Ok(())
    }
}
