mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// All versioned API routes, mounted under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}
