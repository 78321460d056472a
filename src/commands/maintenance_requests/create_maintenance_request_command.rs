use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::maintenance_request::{self, EquipmentStatus, MaintenanceType, RequestStatus},
};
use async_trait::async_trait;
use chrono::{Local, Utc};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::non_blank;

/// Opens a new maintenance request in the `open` state
#[derive(Debug, Clone, Validate)]
pub struct CreateMaintenanceRequestCommand {
    pub requested_by: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub requester_name: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    pub maintenance_type: MaintenanceType,
    pub equipment_status: EquipmentStatus,
    #[validate(length(max = 100))]
    pub equipment_location_press: Option<String>,
    #[validate(length(max = 50))]
    pub equipment_location_press_number: Option<String>,
    #[validate(length(max = 100))]
    pub equipment_location_thread: Option<String>,
    #[validate(length(max = 50))]
    pub equipment_location_thread_number: Option<String>,
    #[validate(length(max = 100))]
    pub equipment_location_other: Option<String>,
    #[validate(length(max = 50))]
    pub equipment_location_other_number: Option<String>,
    #[validate(length(min = 1))]
    pub problem_description: String,
}

#[async_trait]
impl Command for CreateMaintenanceRequestCommand {
    type Result = maintenance_request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(requested_by = %self.requested_by))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        if self.requester_name.trim().is_empty()
            || self.department.trim().is_empty()
            || self.problem_description.trim().is_empty()
        {
            return Err(ServiceError::ValidationError(
                "requester_name, department and problem_description must not be blank".into(),
            ));
        }

        let active = self.to_active_model();
        let created = db_pool
            .transaction::<_, maintenance_request::Model, ServiceError>(move |txn| {
                Box::pin(async move { Ok(active.insert(txn).await?) })
            })
            .await?;

        info!(request_id = created.id, "Maintenance request created");

        event_sender
            .send_or_log(Event::MaintenanceRequestCreated {
                request_id: created.id,
                requested_by: self.requested_by,
                department: created.department.clone(),
            })
            .await;

        Ok(created)
    }
}

impl CreateMaintenanceRequestCommand {
    fn to_active_model(&self) -> maintenance_request::ActiveModel {
        let requested_at = Local::now().naive_local();
        let now = Utc::now();

        maintenance_request::ActiveModel {
            requester_name: Set(self.requester_name.trim().to_string()),
            request_date: Set(requested_at.date()),
            request_time: Set(requested_at.time()),
            department: Set(self.department.trim().to_string()),
            maintenance_type: Set(self.maintenance_type),
            equipment_status: Set(self.equipment_status),
            equipment_location_press: Set(non_blank(&self.equipment_location_press)),
            equipment_location_press_number: Set(non_blank(
                &self.equipment_location_press_number,
            )),
            equipment_location_thread: Set(non_blank(&self.equipment_location_thread)),
            equipment_location_thread_number: Set(non_blank(
                &self.equipment_location_thread_number,
            )),
            equipment_location_other: Set(non_blank(&self.equipment_location_other)),
            equipment_location_other_number: Set(non_blank(
                &self.equipment_location_other_number,
            )),
            problem_description: Set(self.problem_description.clone()),
            status: Set(RequestStatus::Open),
            technician_name: Set(None),
            start_time: Set(None),
            end_time: Set(None),
            resolution_notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}
