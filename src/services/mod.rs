pub mod maintenance_requests;

pub use maintenance_requests::MaintenanceRequestService;
