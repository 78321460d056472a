use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends after a committed change. Failure is logged, never propagated,
    /// since the change it describes has already been persisted.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("{}", e);
        }
    }
}

/// Domain events for the maintenance request lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    MaintenanceRequestCreated {
        request_id: i32,
        requested_by: Uuid,
        department: String,
    },
    MaintenanceStarted {
        request_id: i32,
        started_by: Uuid,
        technician_name: Option<String>,
        started_at: DateTime<Utc>,
    },
    MaintenanceFinished {
        request_id: i32,
        finished_by: Uuid,
        finished_at: DateTime<Utc>,
        total_time: Option<String>,
    },
    MaintenanceRequestUpdated {
        request_id: i32,
        updated_by: Uuid,
    },
    MaintenanceRequestDeleted {
        request_id: i32,
        deleted_by: Uuid,
    },
}

impl Event {
    pub fn request_id(&self) -> i32 {
        match self {
            Event::MaintenanceRequestCreated { request_id, .. }
            | Event::MaintenanceStarted { request_id, .. }
            | Event::MaintenanceFinished { request_id, .. }
            | Event::MaintenanceRequestUpdated { request_id, .. }
            | Event::MaintenanceRequestDeleted { request_id, .. } => *request_id,
        }
    }
}

/// Creates a bounded channel and the sender half used by commands
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::MaintenanceRequestCreated {
                request_id,
                requested_by,
                department,
            } => info!(
                request_id,
                requested_by = %requested_by,
                department = %department,
                "Maintenance request opened"
            ),
            Event::MaintenanceStarted {
                request_id,
                started_by,
                technician_name,
                started_at,
            } => info!(
                request_id,
                started_by = %started_by,
                technician = technician_name.as_deref().unwrap_or("-"),
                started_at = %started_at,
                "Maintenance started"
            ),
            Event::MaintenanceFinished {
                request_id,
                finished_by,
                finished_at,
                total_time,
            } => info!(
                request_id,
                finished_by = %finished_by,
                finished_at = %finished_at,
                total_time = total_time.as_deref().unwrap_or("-"),
                "Maintenance finished"
            ),
            Event::MaintenanceRequestUpdated {
                request_id,
                updated_by,
            } => info!(request_id, updated_by = %updated_by, "Maintenance request updated"),
            Event::MaintenanceRequestDeleted {
                request_id,
                deleted_by,
            } => info!(request_id, deleted_by = %deleted_by, "Maintenance request deleted"),
        }
    }

    info!("Event processing loop stopped");
}
