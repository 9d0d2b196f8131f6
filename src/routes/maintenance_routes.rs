use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::api::ApiResponse;
use crate::dto::maintenance_dto::LogMaintenanceRequest;
use crate::middleware::owner::AuthenticatedOwner;
use crate::models::maintenance::MaintenanceEvent;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new().route("/", post(log_maintenance))
}

async fn log_maintenance(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Json(request): Json<LogMaintenanceRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceEvent>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.log_event(owner.owner_id, request).await?;
    Ok(Json(response))
}
