use crate::{
    auth::{Action, AuthRouterExt, AuthUser},
    commands::maintenance_requests::{
        CreateMaintenanceRequestCommand, DeleteMaintenanceRequestCommand,
        FinishMaintenanceCommand, StartMaintenanceCommand, UpdateMaintenanceRequestCommand,
    },
    commands::maintenance_requests::not_found,
    handlers::common::{JsonBody, OptionalJsonBody, QueryParams},
    models::maintenance_request::{self, EquipmentStatus, MaintenanceType, RequestStatus},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceRequestListQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size, capped at the configured maximum
    pub limit: Option<u64>,
    pub status: Option<RequestStatus>,
}

/// A maintenance request as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 42,
    "maintenance_number": 42,
    "requester_name": "Dana Ortiz",
    "request_date": "2024-05-02",
    "request_time": "08:15:00",
    "department": "Assembly",
    "maintenance_type": "mechanical",
    "equipment_status": "inoperative",
    "equipment_location_press": "Press A",
    "equipment_location_press_number": "3",
    "problem_description": "Hydraulic line leaking under the ram",
    "status": "done",
    "technician_name": "Sam Lee",
    "start_time": "2024-05-02T08:30:00Z",
    "end_time": "2024-05-02T10:00:00Z",
    "resolution_notes": "Replaced seal",
    "total_time": "1h 30m",
    "created_at": "2024-05-02T08:15:00Z",
    "updated_at": "2024-05-02T10:00:00Z"
}))]
pub struct MaintenanceRequestResponse {
    pub id: i32,
    /// Number shown on the request form; equal to `id`
    pub maintenance_number: i32,
    pub requester_name: String,
    pub request_date: NaiveDate,
    pub request_time: NaiveTime,
    pub department: String,
    pub maintenance_type: MaintenanceType,
    pub equipment_status: EquipmentStatus,
    pub equipment_location_press: Option<String>,
    pub equipment_location_press_number: Option<String>,
    pub equipment_location_thread: Option<String>,
    pub equipment_location_thread_number: Option<String>,
    pub equipment_location_other: Option<String>,
    pub equipment_location_other_number: Option<String>,
    pub problem_description: String,
    pub status: RequestStatus,
    pub technician_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    /// Elapsed time such as "1d 2h 5m"; null until the request is finished
    pub total_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<maintenance_request::Model> for MaintenanceRequestResponse {
    fn from(model: maintenance_request::Model) -> Self {
        let total_time = model.total_time();
        Self {
            id: model.id,
            maintenance_number: model.maintenance_number(),
            requester_name: model.requester_name,
            request_date: model.request_date,
            request_time: model.request_time,
            department: model.department,
            maintenance_type: model.maintenance_type,
            equipment_status: model.equipment_status,
            equipment_location_press: model.equipment_location_press,
            equipment_location_press_number: model.equipment_location_press_number,
            equipment_location_thread: model.equipment_location_thread,
            equipment_location_thread_number: model.equipment_location_thread_number,
            equipment_location_other: model.equipment_location_other,
            equipment_location_other_number: model.equipment_location_other_number,
            problem_description: model.problem_description,
            status: model.status,
            technician_name: model.technician_name,
            start_time: model.start_time,
            end_time: model.end_time,
            resolution_notes: model.resolution_notes,
            total_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "requester_name": "Dana Ortiz",
    "department": "Assembly",
    "maintenance_type": "mechanical",
    "equipment_status": "inoperative",
    "equipment_location_press": "Press A",
    "equipment_location_press_number": "3",
    "problem_description": "Hydraulic line leaking under the ram"
}))]
pub struct CreateMaintenanceRequest {
    pub requester_name: String,
    pub department: String,
    pub maintenance_type: MaintenanceType,
    pub equipment_status: EquipmentStatus,
    pub equipment_location_press: Option<String>,
    pub equipment_location_press_number: Option<String>,
    pub equipment_location_thread: Option<String>,
    pub equipment_location_thread_number: Option<String>,
    pub equipment_location_other: Option<String>,
    pub equipment_location_other_number: Option<String>,
    pub problem_description: String,
}

/// Only supplied fields change. Status and lifecycle timestamps are not
/// accepted here.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateMaintenanceRequest {
    pub requester_name: Option<String>,
    pub department: Option<String>,
    pub maintenance_type: Option<MaintenanceType>,
    pub equipment_status: Option<EquipmentStatus>,
    pub equipment_location_press: Option<String>,
    pub equipment_location_press_number: Option<String>,
    pub equipment_location_thread: Option<String>,
    pub equipment_location_thread_number: Option<String>,
    pub equipment_location_other: Option<String>,
    pub equipment_location_other_number: Option<String>,
    pub problem_description: Option<String>,
    pub technician_name: Option<String>,
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({ "technician_name": "Sam Lee" }))]
pub struct StartMaintenanceRequest {
    pub technician_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({ "resolution_notes": "Replaced seal, tested under load" }))]
pub struct FinishMaintenanceRequest {
    pub resolution_notes: Option<String>,
}

/// Maintenance request routes, each group gated on the action it performs
pub fn maintenance_request_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_maintenance_requests))
        .route("/:id", get(get_maintenance_request))
        .with_permission(Action::Read);

    let create = Router::new()
        .route("/", post(create_maintenance_request))
        .with_permission(Action::Create);

    let start = Router::new()
        .route("/:id/start", post(start_maintenance))
        .with_permission(Action::Start);

    let finish = Router::new()
        .route("/:id/finish", post(finish_maintenance))
        .with_permission(Action::Finish);

    let update = Router::new()
        .route(
            "/:id",
            axum::routing::put(update_maintenance_request).patch(update_maintenance_request),
        )
        .with_permission(Action::Update);

    let delete = Router::new()
        .route("/:id", axum::routing::delete(delete_maintenance_request))
        .with_permission(Action::Delete);

    Router::new()
        .merge(read)
        .merge(create)
        .merge(start)
        .merge(finish)
        .merge(update)
        .merge(delete)
}

#[utoipa::path(
    get,
    path = "/api/v1/maintenance-requests",
    params(MaintenanceRequestListQuery),
    responses(
        (status = 200, description = "Maintenance requests listed, newest first", body = ApiResponse<PaginatedResponse<MaintenanceRequestResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn list_maintenance_requests(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MaintenanceRequestListQuery>,
) -> ApiResult<PaginatedResponse<MaintenanceRequestResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.config.default_page_size)
        .clamp(1, state.config.max_page_size);

    let (records, total) = state
        .maintenance_request_service()
        .list_requests(page, limit, query.status)
        .await?;

    let items = records
        .into_iter()
        .map(MaintenanceRequestResponse::from)
        .collect();
    let total_pages = total.div_ceil(limit);

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/maintenance-requests/:id",
    params(
        ("id" = i32, Path, description = "Maintenance request ID")
    ),
    responses(
        (status = 200, description = "Maintenance request fetched", body = ApiResponse<MaintenanceRequestResponse>),
        (status = 404, description = "Maintenance request not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn get_maintenance_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<MaintenanceRequestResponse> {
    let request = state
        .maintenance_request_service()
        .get_request(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::success(request.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests",
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Maintenance request opened", body = ApiResponse<MaintenanceRequestResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not a requester", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn create_maintenance_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceRequestResponse>>), crate::errors::ServiceError>
{
    let command = CreateMaintenanceRequestCommand {
        requested_by: user.user_id,
        requester_name: payload.requester_name,
        department: payload.department,
        maintenance_type: payload.maintenance_type,
        equipment_status: payload.equipment_status,
        equipment_location_press: payload.equipment_location_press,
        equipment_location_press_number: payload.equipment_location_press_number,
        equipment_location_thread: payload.equipment_location_thread,
        equipment_location_thread_number: payload.equipment_location_thread_number,
        equipment_location_other: payload.equipment_location_other,
        equipment_location_other_number: payload.equipment_location_other_number,
        problem_description: payload.problem_description,
    };

    let created = state
        .maintenance_request_service()
        .create_request(command)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/:id/start",
    request_body = StartMaintenanceRequest,
    params(
        ("id" = i32, Path, description = "Maintenance request ID")
    ),
    responses(
        (status = 200, description = "Maintenance started", body = ApiResponse<MaintenanceRequestResponse>),
        (status = 400, description = "Already started or finished", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not maintenance staff", body = crate::errors::ErrorResponse),
        (status = 404, description = "Maintenance request not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn start_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    OptionalJsonBody(payload): OptionalJsonBody<StartMaintenanceRequest>,
) -> ApiResult<MaintenanceRequestResponse> {
    let command = StartMaintenanceCommand {
        request_id: id,
        started_by: user.user_id,
        technician_name: payload.technician_name,
    };

    let started = state
        .maintenance_request_service()
        .start_request(command)
        .await?;
    Ok(Json(ApiResponse::success(started.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/:id/finish",
    request_body = FinishMaintenanceRequest,
    params(
        ("id" = i32, Path, description = "Maintenance request ID")
    ),
    responses(
        (status = 200, description = "Maintenance finished", body = ApiResponse<MaintenanceRequestResponse>),
        (status = 400, description = "Not started or already finished", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not maintenance staff", body = crate::errors::ErrorResponse),
        (status = 404, description = "Maintenance request not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn finish_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    OptionalJsonBody(payload): OptionalJsonBody<FinishMaintenanceRequest>,
) -> ApiResult<MaintenanceRequestResponse> {
    let command = FinishMaintenanceCommand {
        request_id: id,
        finished_by: user.user_id,
        resolution_notes: payload.resolution_notes,
    };

    let finished = state
        .maintenance_request_service()
        .finish_request(command)
        .await?;
    Ok(Json(ApiResponse::success(finished.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/maintenance-requests/:id",
    request_body = UpdateMaintenanceRequest,
    params(
        ("id" = i32, Path, description = "Maintenance request ID")
    ),
    responses(
        (status = 200, description = "Maintenance request updated", body = ApiResponse<MaintenanceRequestResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Maintenance request not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn update_maintenance_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateMaintenanceRequest>,
) -> ApiResult<MaintenanceRequestResponse> {
    let command = UpdateMaintenanceRequestCommand {
        request_id: id,
        updated_by: user.user_id,
        requester_name: payload.requester_name,
        department: payload.department,
        maintenance_type: payload.maintenance_type,
        equipment_status: payload.equipment_status,
        equipment_location_press: payload.equipment_location_press,
        equipment_location_press_number: payload.equipment_location_press_number,
        equipment_location_thread: payload.equipment_location_thread,
        equipment_location_thread_number: payload.equipment_location_thread_number,
        equipment_location_other: payload.equipment_location_other,
        equipment_location_other_number: payload.equipment_location_other_number,
        problem_description: payload.problem_description,
        technician_name: payload.technician_name,
        resolution_notes: payload.resolution_notes,
    };

    let updated = state
        .maintenance_request_service()
        .update_request(command)
        .await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/maintenance-requests/:id",
    params(
        ("id" = i32, Path, description = "Maintenance request ID")
    ),
    responses(
        (status = 204, description = "Maintenance request deleted"),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse),
        (status = 404, description = "Maintenance request not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-requests"
)]
pub async fn delete_maintenance_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, crate::errors::ServiceError> {
    state
        .maintenance_request_service()
        .delete_request(DeleteMaintenanceRequestCommand {
            request_id: id,
            deleted_by: user.user_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
