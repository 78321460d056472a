use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maintenance Desk API",
        version = "1.0.0",
        description = r#"
# Maintenance Desk API

Tracks maintenance requests raised on the shop floor from intake to completion.

## Lifecycle

A request is opened by a requester, started by maintenance staff and then
finished. Status only moves forward: `open` -> `in_progress` -> `done`.
Starting a request twice, or finishing one that was never started, fails with
`400 Bad Request` and leaves the record unchanged.

## Authentication

Obtain a token from `POST /auth/login` and send it on every call:

```
Authorization: Bearer <your-jwt-token>
```

| Role | May |
|---|---|
| requester | open requests, read |
| maintenance | start, finish, edit, read |
| admin | delete, read |

## Pagination

`GET /api/v1/maintenance-requests` accepts `page` (default 1), `limit`
(default 20, max 100) and an optional `status` filter.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "maintenance-requests", description = "Maintenance request lifecycle"),
        (name = "auth", description = "Login and identity")
    ),
    paths(
        crate::handlers::maintenance_requests::list_maintenance_requests,
        crate::handlers::maintenance_requests::get_maintenance_request,
        crate::handlers::maintenance_requests::create_maintenance_request,
        crate::handlers::maintenance_requests::start_maintenance,
        crate::handlers::maintenance_requests::finish_maintenance,
        crate::handlers::maintenance_requests::update_maintenance_request,
        crate::handlers::maintenance_requests::delete_maintenance_request,
        crate::auth::login_handler,
        crate::auth::me_handler,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::handlers::maintenance_requests::MaintenanceRequestResponse,
            crate::handlers::maintenance_requests::CreateMaintenanceRequest,
            crate::handlers::maintenance_requests::UpdateMaintenanceRequest,
            crate::handlers::maintenance_requests::StartMaintenanceRequest,
            crate::handlers::maintenance_requests::FinishMaintenanceRequest,
            crate::models::MaintenanceType,
            crate::models::EquipmentStatus,
            crate::models::RequestStatus,
            crate::auth::Role,
            crate::auth::AuthUser,
            crate::auth::TokenPair,
            crate::auth::LoginCredentials,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDocV1::openapi())
}
