//! Scheduler de reminders
//!
//! Convierte proyecciones de vencimiento en reminders persistidos y responde
//! "qué vence en los próximos N días". El auto-scheduling por owner procesa
//! cada vehículo de forma independiente: el fallo de uno no cancela a los
//! hermanos.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reminder::{encode_channels, Reminder, ReminderChannel, ReminderKind};
use crate::models::vehicle::Vehicle;
use crate::repositories::reminder_repository::{ReminderDraft, ReminderRepository};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

/// Lead time por defecto cuando el caller no manda uno
pub const DEFAULT_LEAD_TIME_DAYS: i32 = 30;

/// Lead time de los reminders automáticos de registro
const AUTO_REGISTRATION_LEAD_DAYS: i32 = 30;

/// Lead time de los reminders automáticos de emisiones
const AUTO_EMISSIONS_LEAD_DAYS: i32 = 45;

/// Parámetros de un schedule manual
#[derive(Debug, Clone)]
pub struct ScheduleParams {
    pub vehicle_id: Uuid,
    pub kind: ReminderKind,
    pub due_on: NaiveDate,
    pub lead_time_days: i32,
    pub channels: Vec<ReminderChannel>,
    pub notes: Option<String>,
}

/// Resumen del auto-scheduling de un owner
#[derive(Debug, Default, Serialize)]
pub struct AutoScheduleSummary {
    pub vehicles: usize,
    pub scheduled: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Fecha de notificación derivada: `due_on - lead_time_days`
pub fn notify_date(due_on: NaiveDate, lead_time_days: i32) -> NaiveDate {
    due_on - Duration::days(lead_time_days as i64)
}

/// Fin de la ventana rodante: `today + window_days`, con aritmética chequeada
///
/// Un `window_days` que desborde el rango de fechas es un error del caller,
/// nunca un panic del handler.
pub fn due_window_end(today: NaiveDate, window_days: i64) -> Result<NaiveDate, AppError> {
    Duration::try_days(window_days)
        .and_then(|window| today.checked_add_signed(window))
        .ok_or_else(|| AppError::BadRequest("within_days is out of range".to_string()))
}

pub struct ReminderScheduler {
    vehicles: VehicleRepository,
    reminders: ReminderRepository,
}

impl ReminderScheduler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            reminders: ReminderRepository::new(pool),
        }
    }

    /// Agendar un reminder para un vehículo del owner
    ///
    /// Un vehicle_id de otro owner responde NotFound, igual que uno
    /// inexistente: no se filtra existencia entre cuentas. No deduplica;
    /// el caller que orquesta auto-scheduling es responsable de no agendar
    /// dos veces la misma obligación.
    pub async fn schedule(
        &self,
        owner_id: Uuid,
        params: ScheduleParams,
    ) -> Result<Reminder, AppError> {
        self.vehicles
            .find_by_id(owner_id, params.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let draft = ReminderDraft {
            owner_id,
            vehicle_id: params.vehicle_id,
            kind: params.kind.as_str().to_string(),
            due_on: params.due_on,
            lead_time_days: params.lead_time_days,
            notify_on: Some(notify_date(params.due_on, params.lead_time_days)),
            channels_raw: encode_channels(&params.channels),
            notes: params.notes,
        };

        self.reminders.create(&draft).await
    }

    /// Reminders del owner que vencen dentro de la ventana rodante
    pub async fn due_within(
        &self,
        owner_id: Uuid,
        window_days: i64,
    ) -> Result<Vec<Reminder>, AppError> {
        let now = Utc::now();
        let today = now.date_naive();
        let window_end = due_window_end(today, window_days)?;

        self.reminders
            .find_due_between(owner_id, today, window_end, now)
            .await
    }

    /// Marcar un reminder como satisfecho (idempotente)
    pub async fn mark_satisfied(&self, owner_id: Uuid, id: Uuid) -> Result<Reminder, AppError> {
        self.reminders
            .mark_satisfied(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reminder not found".to_string()))
    }

    /// Auto-agendar reminders de compliance para todos los vehículos del owner
    ///
    /// Registro: solo cuando la fecha proyectada ya pasó (lead 30 días,
    /// PUSH+EMAIL). Emisiones: siempre que haya fecha proyectada (lead 45
    /// días, PUSH). Cada vehículo es un intento independiente; los fallos se
    /// acumulan en el resumen sin abortar el lote.
    pub async fn auto_schedule_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<AutoScheduleSummary, AppError> {
        let vehicles = self.vehicles.find_by_owner(owner_id).await?;
        let today = Utc::now().date_naive();

        let attempts = vehicles
            .iter()
            .map(|vehicle| self.auto_schedule_vehicle(owner_id, vehicle, today));
        let outcomes = futures::future::join_all(attempts).await;

        let mut summary = AutoScheduleSummary {
            vehicles: vehicles.len(),
            ..Default::default()
        };

        for (vehicle, outcome) in vehicles.iter().zip(outcomes) {
            match outcome {
                Ok((scheduled, skipped)) => {
                    summary.scheduled += scheduled;
                    summary.skipped += skipped;
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        "Auto-schedule failed for vehicle {} ({}): {}",
                        vehicle.id,
                        vehicle.vin,
                        e
                    );
                }
            }
        }

        Ok(summary)
    }

    /// Intento de auto-scheduling para un vehículo: (agendados, salteados)
    async fn auto_schedule_vehicle(
        &self,
        owner_id: Uuid,
        vehicle: &Vehicle,
        today: NaiveDate,
    ) -> Result<(u32, u32), AppError> {
        let mut scheduled = 0;
        let mut skipped = 0;

        if let Some(due_on) = vehicle.registration_due_on {
            if due_on < today {
                if self
                    .upsert_obligation(
                        owner_id,
                        vehicle.id,
                        ReminderKind::Registration,
                        due_on,
                        AUTO_REGISTRATION_LEAD_DAYS,
                        vec![ReminderChannel::Push, ReminderChannel::Email],
                        "Automatic registration renewal reminder",
                    )
                    .await?
                {
                    scheduled += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        if let Some(due_on) = vehicle.emissions_due_on {
            if self
                .upsert_obligation(
                    owner_id,
                    vehicle.id,
                    ReminderKind::Emissions,
                    due_on,
                    AUTO_EMISSIONS_LEAD_DAYS,
                    vec![ReminderChannel::Push],
                    "Automatic emissions testing reminder",
                )
                .await?
            {
                scheduled += 1;
            } else {
                skipped += 1;
            }
        }

        Ok((scheduled, skipped))
    }

    /// Insertar salvo que la obligación ya tenga un reminder abierto
    ///
    /// Deduplicación por (vehicle_id, kind, due_on): invocar el auto-schedule
    /// dos veces no duplica reminders para la misma obligación.
    #[allow(clippy::too_many_arguments)]
    async fn upsert_obligation(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        kind: ReminderKind,
        due_on: NaiveDate,
        lead_time_days: i32,
        channels: Vec<ReminderChannel>,
        notes: &str,
    ) -> Result<bool, AppError> {
        if self
            .reminders
            .open_obligation_exists(vehicle_id, kind.as_str(), due_on)
            .await?
        {
            return Ok(false);
        }

        let draft = ReminderDraft {
            owner_id,
            vehicle_id,
            kind: kind.as_str().to_string(),
            due_on,
            lead_time_days,
            notify_on: Some(notify_date(due_on, lead_time_days)),
            channels_raw: encode_channels(&channels),
            notes: Some(notes.to_string()),
        };

        self.reminders.create(&draft).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_notify_date_subtracts_lead_time() {
        assert_eq!(notify_date(date(2026, 2, 12), 30), date(2026, 1, 13));
        assert_eq!(notify_date(date(2025, 7, 1), 45), date(2025, 5, 17));
    }

    #[test]
    fn test_notify_date_default_lead() {
        assert_eq!(
            notify_date(date(2025, 3, 31), DEFAULT_LEAD_TIME_DAYS),
            date(2025, 3, 1)
        );
    }

    #[test]
    fn test_notify_date_crosses_year_boundary() {
        assert_eq!(notify_date(date(2026, 1, 10), 30), date(2025, 12, 11));
    }

    #[test]
    fn test_due_window_end_adds_days() {
        assert_eq!(
            due_window_end(date(2025, 6, 1), 90).unwrap(),
            date(2025, 8, 30)
        );
    }

    #[test]
    fn test_due_window_end_rejects_out_of_range_days() {
        let result = due_window_end(date(2025, 6, 1), 100_000_000_000);
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let beyond_duration_range = due_window_end(date(2025, 6, 1), i64::MAX);
        assert!(matches!(
            beyond_duration_range,
            Err(AppError::BadRequest(_))
        ));
    }
}
