use crate::models::maintenance::MaintenanceEvent;
use crate::utils::errors::AppError;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Datos para registrar un evento de mantenimiento
#[derive(Debug, Clone)]
pub struct MaintenanceDraft {
    pub vehicle_id: Uuid,
    pub service_date: NaiveDate,
    pub headline: String,
    pub odometer: Option<i32>,
    pub cost_cents: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &MaintenanceDraft) -> Result<MaintenanceEvent, AppError> {
        let id = Uuid::new_v4();

        let event = sqlx::query_as::<_, MaintenanceEvent>(
            r#"
            INSERT INTO maintenance_events (
                id, vehicle_id, service_date, headline, odometer, cost_cents,
                location, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.vehicle_id)
        .bind(draft.service_date)
        .bind(&draft.headline)
        .bind(draft.odometer)
        .bind(draft.cost_cents)
        .bind(&draft.location)
        .bind(&draft.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Historial de servicio, más reciente primero
    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceEvent>, AppError> {
        let events = sqlx::query_as::<_, MaintenanceEvent>(
            "SELECT * FROM maintenance_events WHERE vehicle_id = $1 ORDER BY service_date DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
