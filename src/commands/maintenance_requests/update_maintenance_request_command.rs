use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::maintenance_request::{self, EquipmentStatus, MaintenanceType},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{non_blank, not_found};

/// Partial edit of a request. Only fields that are `Some` change; lifecycle
/// state (status and the start/end timestamps) is never writable here.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateMaintenanceRequestCommand {
    pub request_id: i32,
    pub updated_by: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub requester_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    pub maintenance_type: Option<MaintenanceType>,
    pub equipment_status: Option<EquipmentStatus>,
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
    pub problem_description: Option<String>,
    #[validate(length(max = 100))]
    pub technician_name: Option<String>,
    pub resolution_notes: Option<String>,
}

#[async_trait]
impl Command for UpdateMaintenanceRequestCommand {
    type Result = maintenance_request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        self.ensure_required_not_blank()?;

        let command = self.clone();
        let updated = db_pool
            .transaction::<_, maintenance_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = maintenance_request::Entity::find_by_id(command.request_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| not_found(command.request_id))?;

                    let mut active: maintenance_request::ActiveModel = existing.into();
                    command.apply(&mut active);
                    Ok(active.update(txn).await?)
                })
            })
            .await?;

        info!(request_id = updated.id, "Maintenance request updated");

        event_sender
            .send_or_log(Event::MaintenanceRequestUpdated {
                request_id: updated.id,
                updated_by: self.updated_by,
            })
            .await;

        Ok(updated)
    }
}

impl UpdateMaintenanceRequestCommand {
    fn ensure_required_not_blank(&self) -> Result<(), ServiceError> {
        let blank = [
            ("requester_name", &self.requester_name),
            ("department", &self.department),
            ("problem_description", &self.problem_description),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()));

        match blank {
            Some((field, _)) => Err(ServiceError::ValidationError(format!(
                "{} must not be blank",
                field
            ))),
            None => Ok(()),
        }
    }

    /// Copies supplied fields onto the active model. A supplied blank
    /// optional field clears the stored value.
    fn apply(&self, active: &mut maintenance_request::ActiveModel) {
        if let Some(name) = &self.requester_name {
            active.requester_name = Set(name.trim().to_string());
        }
        if let Some(department) = &self.department {
            active.department = Set(department.trim().to_string());
        }
        if let Some(kind) = self.maintenance_type {
            active.maintenance_type = Set(kind);
        }
        if let Some(status) = self.equipment_status {
            active.equipment_status = Set(status);
        }
        if let Some(description) = &self.problem_description {
            active.problem_description = Set(description.clone());
        }

        let optional = [
            (
                &self.equipment_location_press,
                &mut active.equipment_location_press,
            ),
            (
                &self.equipment_location_press_number,
                &mut active.equipment_location_press_number,
            ),
            (
                &self.equipment_location_thread,
                &mut active.equipment_location_thread,
            ),
            (
                &self.equipment_location_thread_number,
                &mut active.equipment_location_thread_number,
            ),
            (
                &self.equipment_location_other,
                &mut active.equipment_location_other,
            ),
            (
                &self.equipment_location_other_number,
                &mut active.equipment_location_other_number,
            ),
            (&self.technician_name, &mut active.technician_name),
            (&self.resolution_notes, &mut active.resolution_notes),
        ];
        for (supplied, column) in optional {
            if supplied.is_some() {
                *column = Set(non_blank(supplied));
            }
        }

        active.updated_at = Set(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::maintenance_request::RequestStatus;
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm::ActiveValue;

    fn stored() -> maintenance_request::Model {
        let now = Utc::now();
        maintenance_request::Model {
            id: 7,
            requester_name: "Dana".into(),
            request_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            request_time: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
            department: "Assembly".into(),
            maintenance_type: MaintenanceType::Mechanical,
            equipment_status: EquipmentStatus::Warning,
            equipment_location_press: Some("Press A".into()),
            equipment_location_press_number: Some("3".into()),
            equipment_location_thread: None,
            equipment_location_thread_number: None,
            equipment_location_other: None,
            equipment_location_other_number: None,
            problem_description: "Hydraulic leak".into(),
            status: RequestStatus::InProgress,
            technician_name: Some("Sam".into()),
            start_time: Some(now),
            end_time: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let command = UpdateMaintenanceRequestCommand {
            request_id: 7,
            department: Some("  Finishing ".into()),
            equipment_location_press: Some("   ".into()),
            resolution_notes: Some("Seal replaced".into()),
            ..Default::default()
        };

        let mut active: maintenance_request::ActiveModel = stored().into();
        command.apply(&mut active);

        assert_eq!(active.department, ActiveValue::Set("Finishing".to_string()));
        assert_eq!(active.equipment_location_press, ActiveValue::Set(None));
        assert_eq!(
            active.resolution_notes,
            ActiveValue::Set(Some("Seal replaced".to_string()))
        );
        assert_eq!(
            active.requester_name,
            ActiveValue::Unchanged("Dana".to_string())
        );
        assert_eq!(active.status, ActiveValue::Unchanged(RequestStatus::InProgress));
        assert!(matches!(active.start_time, ActiveValue::Unchanged(Some(_))));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let command = UpdateMaintenanceRequestCommand {
            request_id: 7,
            requester_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            command.ensure_required_not_blank(),
            Err(ServiceError::ValidationError(msg)) if msg.contains("requester_name")
        ));
    }

    #[test]
    fn overlong_technician_name_fails_validation() {
        let command = UpdateMaintenanceRequestCommand {
            request_id: 7,
            technician_name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(command.validate().is_err());
    }
}
