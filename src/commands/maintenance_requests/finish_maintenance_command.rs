use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::maintenance_request::{self, RequestStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveEnum, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{guard_failure, guard_status, non_blank, not_found};

pub const NOT_IN_PROGRESS: &str = "not started or already finished";

/// Moves an in-progress request to `done` and stamps its end time
#[derive(Debug, Clone)]
pub struct FinishMaintenanceCommand {
    pub request_id: i32,
    pub finished_by: Uuid,
    pub resolution_notes: Option<String>,
}

#[async_trait]
impl Command for FinishMaintenanceCommand {
    type Result = maintenance_request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let request_id = self.request_id;
        let resolution_notes = non_blank(&self.resolution_notes);
        let from = guard_status(RequestStatus::Done)?;
        let now = Utc::now();

        let finished = db_pool
            .transaction::<_, maintenance_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    use maintenance_request::Column;

                    let mut update = maintenance_request::Entity::update_many()
                        .col_expr(Column::Status, Expr::value(RequestStatus::Done.to_value()))
                        .col_expr(Column::EndTime, Expr::value(now))
                        .col_expr(Column::UpdatedAt, Expr::value(now));

                    if let Some(notes) = resolution_notes {
                        update = update.col_expr(Column::ResolutionNotes, Expr::value(notes));
                    }

                    let result = update
                        .filter(Column::Id.eq(request_id))
                        .filter(Column::Status.eq(from.to_value()))
                        .exec(txn)
                        .await?;

                    if result.rows_affected == 0 {
                        return Err(guard_failure(txn, request_id, NOT_IN_PROGRESS).await);
                    }

                    maintenance_request::Entity::find_by_id(request_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| not_found(request_id))
                })
            })
            .await
            .map_err(|e| {
                let err = ServiceError::from(e);
                if matches!(err, ServiceError::InvalidTransition(_)) {
                    warn!(request_id, "Finish rejected: {}", err);
                }
                err
            })?;

        let total_time = finished.total_time();
        info!(
            request_id,
            total_time = total_time.as_deref().unwrap_or("-"),
            "Maintenance finished"
        );

        event_sender
            .send_or_log(Event::MaintenanceFinished {
                request_id,
                finished_by: self.finished_by,
                finished_at: finished.end_time.unwrap_or(now),
                total_time,
            })
            .await;

        Ok(finished)
    }
}
