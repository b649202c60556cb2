//! OpenAPI documentation served through Swagger UI.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{error, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::google_auth,
        handlers::auth::get_current_user,
        handlers::auth::logout,
        handlers::workspaces::get_current_workspace,
        handlers::workspaces::switch_workspace,
        handlers::health::health,
        handlers::health::status,
        handlers::health::live,
        handlers::health::ready,
    ),
    components(schemas(
        handlers::auth::RegisterRequest,
        handlers::auth::RegisterResponse,
        handlers::auth::LoginRequest,
        handlers::auth::GoogleAuthRequest,
        handlers::auth::AuthResponse,
        handlers::auth::UserResponse,
        handlers::auth::MeResponse,
        handlers::workspaces::WorkspaceResponse,
        handlers::workspaces::MemberResponse,
        handlers::workspaces::CurrentWorkspaceResponse,
        handlers::workspaces::SwitchWorkspaceResponse,
        handlers::health::HealthResponse,
        handlers::health::StatusResponse,
        error::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session endpoints"),
        (name = "Workspaces", description = "Workspace membership and switching"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    info(
        title = "TeamHive API",
        description = "Multi-tenant team collaboration backend",
        version = env!("CARGO_PKG_VERSION")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
