//! Workflow de upsert de vehículos
//!
//! Orquesta el alta/edición: valida el payload, resuelve identidad (por id
//! o por VIN), recalcula la proyección de compliance y persiste el registro
//! completo con las fechas derivadas. La escritura es la única fuente de
//! verdad de `registration_due_on`/`emissions_due_on`.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::api::ApiResponse;
use crate::dto::vehicle_dto::{UpsertVehicleRequest, VehicleDetailResponse, VehicleResponse};
use crate::models::reminder::ReminderKind;
use crate::models::vehicle::VehicleDraft;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::reminder_repository::ReminderRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::compliance_projector::{project, ComplianceInput};
use crate::utils::errors::AppError;

pub struct VehicleController {
    vehicles: VehicleRepository,
    reminders: ReminderRepository,
    maintenance: MaintenanceRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            reminders: ReminderRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn upsert(
        &self,
        owner_id: Uuid,
        request: UpsertVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate_fields().map_err(AppError::Validation)?;

        let vin = request.vin.trim().to_string();
        let jurisdiction = request.registration_jurisdiction.trim().to_uppercase();
        let fuel_type = request.fuel_type.unwrap_or_default();

        // Resolución de identidad: id explícito gana; si no, la clave
        // natural (vin, owner)
        let existing = match request.id {
            Some(id) => self.vehicles.find_by_id(owner_id, id).await?,
            None => self.vehicles.find_by_vin(owner_id, &vin).await?,
        };

        // La proyección corre antes de persistir, nunca intercalada con la
        // escritura. Un alta sin fecha de renovación usa hoy como baseline;
        // el proyector no acepta baselines sin resolver.
        let today = Utc::now().date_naive();
        let registration_baseline = request.last_registration_renewal.unwrap_or(today);
        let projection = project(&ComplianceInput {
            jurisdiction: &jurisdiction,
            model_year: request.model_year,
            fuel_type: fuel_type.as_str(),
            last_registration_on: Some(registration_baseline),
            last_emissions_on: request.last_emissions_test,
            reference_date: today,
        })?;

        let draft = VehicleDraft {
            owner_id,
            vin,
            make: request.make,
            model: request.model,
            model_year: request.model_year,
            trim: request.trim,
            license_plate: request.license_plate,
            color: request.color,
            mileage: request.mileage,
            registration_jurisdiction: jurisdiction,
            fuel_type: fuel_type.as_str().to_string(),
            vehicle_type: request.vehicle_type.as_str().to_string(),
            purpose: request.purpose.as_str().to_string(),
            last_registration_renewal: request.last_registration_renewal,
            registration_due_on: Some(projection.registration_due_on),
            last_emissions_test: request.last_emissions_test,
            emissions_due_on: projection.emissions_due_on,
        };

        let (vehicle, created) = match existing {
            Some(current) => (self.vehicles.update(current.id, &draft).await?, false),
            None => (self.vehicles.create(&draft).await?, true),
        };

        // Una edición puede mover las fechas proyectadas: los reminders de
        // compliance abiertos se reapuntan a la proyección vigente en vez de
        // quedar colgados del vencimiento anterior
        if !created {
            self.reminders
                .reconcile_open_obligation(
                    vehicle.id,
                    ReminderKind::Registration.as_str(),
                    vehicle.registration_due_on,
                )
                .await?;
            self.reminders
                .reconcile_open_obligation(
                    vehicle.id,
                    ReminderKind::Emissions.as_str(),
                    vehicle.emissions_due_on,
                )
                .await?;
        }

        let message = if created {
            "Vehicle created successfully"
        } else {
            "Vehicle updated successfully"
        };

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            message.to_string(),
        ))
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.vehicles.find_by_owner(owner_id).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_detail(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<VehicleDetailResponse, AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let reminders = self.reminders.find_by_vehicle(vehicle.id).await?;
        let maintenance_events = self.maintenance.find_by_vehicle(vehicle.id).await?;

        Ok(VehicleDetailResponse {
            vehicle: VehicleResponse::from(vehicle),
            reminders: reminders.into_iter().map(Into::into).collect(),
            maintenance_events,
        })
    }

    /// Borrado con limpieza transaccional de reminders y mantenimiento
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = self.vehicles.delete_with_children(owner_id, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }
        Ok(())
    }
}
