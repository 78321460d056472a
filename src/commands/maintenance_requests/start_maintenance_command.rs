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
    sea_query::{Expr, Func},
    ActiveEnum, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::{guard_failure, guard_status, non_blank, not_found};

pub const ALREADY_STARTED: &str = "already started or finished";

/// Moves an open request to `in_progress` and stamps its start time
#[derive(Debug, Clone, Validate)]
pub struct StartMaintenanceCommand {
    pub request_id: i32,
    pub started_by: Uuid,
    #[validate(length(max = 100))]
    pub technician_name: Option<String>,
}

#[async_trait]
impl Command for StartMaintenanceCommand {
    type Result = maintenance_request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;

        let request_id = self.request_id;
        let technician_name = non_blank(&self.technician_name);
        let from = guard_status(RequestStatus::InProgress)?;
        let now = Utc::now();

        let started = db_pool
            .transaction::<_, maintenance_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    use maintenance_request::Column;

                    // Guard and mutation in one statement: only an open row matches.
                    let mut update = maintenance_request::Entity::update_many()
                        .col_expr(
                            Column::Status,
                            Expr::value(RequestStatus::InProgress.to_value()),
                        )
                        .col_expr(
                            Column::StartTime,
                            Func::coalesce([Expr::col(Column::StartTime).into(), Expr::value(now)])
                                .into(),
                        )
                        .col_expr(Column::UpdatedAt, Expr::value(now));

                    if let Some(name) = technician_name {
                        update = update.col_expr(Column::TechnicianName, Expr::value(name));
                    }

                    let result = update
                        .filter(Column::Id.eq(request_id))
                        .filter(Column::Status.eq(from.to_value()))
                        .exec(txn)
                        .await?;

                    if result.rows_affected == 0 {
                        return Err(guard_failure(txn, request_id, ALREADY_STARTED).await);
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
                    warn!(request_id, "Start rejected: {}", err);
                }
                err
            })?;

        info!(
            request_id,
            technician = started.technician_name.as_deref().unwrap_or("-"),
            "Maintenance started"
        );

        event_sender
            .send_or_log(Event::MaintenanceStarted {
                request_id,
                started_by: self.started_by,
                technician_name: started.technician_name.clone(),
                started_at: started.start_time.unwrap_or(now),
            })
            .await;

        Ok(started)
    }
}
