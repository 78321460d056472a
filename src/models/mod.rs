pub mod maintenance_request;

pub use maintenance_request::{
    compute_duration, format_total_time, EquipmentStatus, MaintenanceType, RequestStatus,
};
