pub mod create_maintenance_request_command;
pub mod delete_maintenance_request_command;
pub mod finish_maintenance_command;
pub mod start_maintenance_command;
pub mod update_maintenance_request_command;

pub use create_maintenance_request_command::CreateMaintenanceRequestCommand;
pub use delete_maintenance_request_command::DeleteMaintenanceRequestCommand;
pub use finish_maintenance_command::FinishMaintenanceCommand;
pub use start_maintenance_command::StartMaintenanceCommand;
pub use update_maintenance_request_command::UpdateMaintenanceRequestCommand;

use crate::{
    errors::ServiceError,
    models::maintenance_request::{self, RequestStatus},
};
use sea_orm::{ConnectionTrait, EntityTrait};

pub(crate) fn not_found(request_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Maintenance request {} not found", request_id))
}

/// Status a request must hold before it may move into `target`
pub(crate) fn guard_status(target: RequestStatus) -> Result<RequestStatus, ServiceError> {
    target.required_predecessor().ok_or_else(|| {
        ServiceError::InternalError(format!("no transition leads into {}", target))
    })
}

/// A guarded update touched no rows: either the request does not exist or
/// its status did not match the guard.
pub(crate) async fn guard_failure<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    reason: &str,
) -> ServiceError {
    match maintenance_request::Entity::find_by_id(request_id)
        .one(conn)
        .await
    {
        Ok(Some(_)) => ServiceError::InvalidTransition(reason.to_string()),
        Ok(None) => not_found(request_id),
        Err(e) => ServiceError::DatabaseError(e),
    }
}

/// Blank optional text is treated as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn guards_follow_the_lifecycle() {
        assert_eq!(
            guard_status(RequestStatus::InProgress).unwrap(),
            RequestStatus::Open
        );
        assert_eq!(
            guard_status(RequestStatus::Done).unwrap(),
            RequestStatus::InProgress
        );
        assert_matches!(
            guard_status(RequestStatus::Open),
            Err(ServiceError::InternalError(_))
        );
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" Sam ".into())), Some("Sam".into()));
        assert_eq!(non_blank(&None), None);
    }
}
