use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api::ApiResponse;
use crate::dto::vehicle_dto::{UpsertVehicleRequest, VehicleDetailResponse, VehicleResponse};
use crate::middleware::owner::AuthenticatedOwner;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(upsert_vehicle).get(list_vehicles))
        .route("/:id", get(get_vehicle).delete(delete_vehicle))
}

/// Alta o edición: un solo endpoint resuelve la identidad por id o por VIN
async fn upsert_vehicle(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Json(request): Json<UpsertVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.upsert(owner.owner_id, request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_owner(owner.owner_id).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleDetailResponse>> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_detail(owner.owner_id, id).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(owner.owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
