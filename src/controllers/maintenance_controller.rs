//! Controller de mantenimiento

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api::ApiResponse;
use crate::dto::maintenance_dto::LogMaintenanceRequest;
use crate::models::maintenance::MaintenanceEvent;
use crate::repositories::maintenance_repository::{MaintenanceDraft, MaintenanceRepository};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct MaintenanceController {
    vehicles: VehicleRepository,
    maintenance: MaintenanceRepository,
}

impl MaintenanceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn log_event(
        &self,
        owner_id: Uuid,
        request: LogMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceEvent>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        // Mismo chequeo de pertenencia que los reminders: un vehículo ajeno
        // es NotFound, no Forbidden
        self.vehicles
            .find_by_id(owner_id, request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let draft = MaintenanceDraft {
            vehicle_id: request.vehicle_id,
            service_date: request.service_date,
            headline: request.headline,
            odometer: request.odometer,
            cost_cents: request.cost_cents,
            location: request.location,
            notes: request.notes,
        };

        let event = self.maintenance.create(&draft).await?;

        Ok(ApiResponse::success_with_message(
            event,
            "Maintenance event logged".to_string(),
        ))
    }
}
