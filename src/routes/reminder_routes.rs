use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::reminder_controller::ReminderController;
use crate::dto::api::ApiResponse;
use crate::dto::reminder_dto::{DueWindowQuery, ReminderResponse, ScheduleReminderRequest};
use crate::middleware::owner::AuthenticatedOwner;
use crate::services::reminder_scheduler::AutoScheduleSummary;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_reminder_router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_reminder).get(list_due_reminders))
        .route("/:id/satisfy", post(mark_satisfied))
        .route("/auto-schedule", post(auto_schedule))
}

async fn schedule_reminder(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Json(request): Json<ScheduleReminderRequest>,
) -> AppResult<Json<ApiResponse<ReminderResponse>>> {
    let controller = ReminderController::new(state.pool.clone());
    let response = controller.schedule(owner.owner_id, request).await?;
    Ok(Json(response))
}

/// Qué vence en los próximos N días (default 90), ascendente por due_on
async fn list_due_reminders(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Query(query): Query<DueWindowQuery>,
) -> AppResult<Json<Vec<ReminderResponse>>> {
    let controller = ReminderController::new(state.pool.clone());
    let response = controller
        .due_within(owner.owner_id, query.within_days)
        .await?;
    Ok(Json(response))
}

async fn mark_satisfied(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReminderResponse>>> {
    let controller = ReminderController::new(state.pool.clone());
    let response = controller.mark_satisfied(owner.owner_id, id).await?;
    Ok(Json(response))
}

async fn auto_schedule(
    owner: AuthenticatedOwner,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AutoScheduleSummary>>> {
    let controller = ReminderController::new(state.pool.clone());
    let response = controller.auto_schedule(owner.owner_id).await?;
    Ok(Json(response))
}
