//! Controller de reminders
//!
//! Capa fina sobre el scheduler: aplica defaults del payload y convierte
//! a DTOs de respuesta.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::api::ApiResponse;
use crate::dto::reminder_dto::{ReminderResponse, ScheduleReminderRequest};
use crate::models::reminder::ReminderChannel;
use crate::services::reminder_scheduler::{
    AutoScheduleSummary, ReminderScheduler, ScheduleParams, DEFAULT_LEAD_TIME_DAYS,
};
use crate::utils::errors::AppError;
use validator::Validate;

/// Ventana por defecto del listado de vencimientos
const DEFAULT_DUE_WINDOW_DAYS: i64 = 90;

/// Ventana máxima aceptada (100 años)
const MAX_DUE_WINDOW_DAYS: i64 = 36_500;

/// Resolver `within_days` del query: default 90, rango [0, 36500]
fn resolve_window_days(within_days: Option<i64>) -> Result<i64, AppError> {
    let window = within_days.unwrap_or(DEFAULT_DUE_WINDOW_DAYS);
    if !(0..=MAX_DUE_WINDOW_DAYS).contains(&window) {
        return Err(AppError::BadRequest(format!(
            "within_days must be between 0 and {}",
            MAX_DUE_WINDOW_DAYS
        )));
    }
    Ok(window)
}

pub struct ReminderController {
    scheduler: ReminderScheduler,
}

impl ReminderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            scheduler: ReminderScheduler::new(pool),
        }
    }

    pub async fn schedule(
        &self,
        owner_id: Uuid,
        request: ScheduleReminderRequest,
    ) -> Result<ApiResponse<ReminderResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let params = ScheduleParams {
            vehicle_id: request.vehicle_id,
            kind: request.kind,
            due_on: request.due_on,
            lead_time_days: request.lead_time_days.unwrap_or(DEFAULT_LEAD_TIME_DAYS),
            channels: request
                .channels
                .unwrap_or_else(|| vec![ReminderChannel::Push]),
            notes: request.notes,
        };

        let reminder = self.scheduler.schedule(owner_id, params).await?;

        Ok(ApiResponse::success_with_message(
            ReminderResponse::from(reminder),
            "Reminder scheduled successfully".to_string(),
        ))
    }

    pub async fn due_within(
        &self,
        owner_id: Uuid,
        within_days: Option<i64>,
    ) -> Result<Vec<ReminderResponse>, AppError> {
        let window = resolve_window_days(within_days)?;
        let reminders = self.scheduler.due_within(owner_id, window).await?;
        Ok(reminders.into_iter().map(ReminderResponse::from).collect())
    }

    pub async fn mark_satisfied(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<ApiResponse<ReminderResponse>, AppError> {
        let reminder = self.scheduler.mark_satisfied(owner_id, id).await?;
        Ok(ApiResponse::success(ReminderResponse::from(reminder)))
    }

    pub async fn auto_schedule(
        &self,
        owner_id: Uuid,
    ) -> Result<ApiResponse<AutoScheduleSummary>, AppError> {
        let summary = self.scheduler.auto_schedule_for_owner(owner_id).await?;
        tracing::info!(
            "Auto-schedule for owner {}: {} scheduled, {} skipped, {} failed",
            owner_id,
            summary.scheduled,
            summary.skipped,
            summary.failed
        );
        Ok(ApiResponse::success(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_to_90() {
        assert_eq!(resolve_window_days(None).unwrap(), 90);
    }

    #[test]
    fn test_window_accepts_bounds() {
        assert_eq!(resolve_window_days(Some(0)).unwrap(), 0);
        assert_eq!(
            resolve_window_days(Some(MAX_DUE_WINDOW_DAYS)).unwrap(),
            MAX_DUE_WINDOW_DAYS
        );
    }

    #[test]
    fn test_window_rejects_negative() {
        assert!(matches!(
            resolve_window_days(Some(-1)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_window_rejects_huge_values() {
        assert!(matches!(
            resolve_window_days(Some(100_000_000_000)),
            Err(AppError::BadRequest(_))
        ));
    }
}
