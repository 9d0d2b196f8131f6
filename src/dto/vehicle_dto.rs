//! DTOs de Vehicle
//!
//! Requests y responses del workflow de upsert. La validación devuelve
//! errores estructurados por campo para que la capa de formulario los
//! muestre junto a cada input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::maintenance::MaintenanceEvent;
use crate::models::vehicle::{FuelType, Vehicle, VehiclePurpose, VehicleType};
use crate::dto::reminder_dto::ReminderResponse;
use crate::utils::validation::{validate_jurisdiction, validate_model_year, validate_vin};

/// Request de upsert de vehículo
///
/// `id` presente = resolución por (id, owner); ausente = por (vin, owner).
/// Las fechas derivadas (`registration_due_on`, `emissions_due_on`) no son
/// parte del payload: siempre se recalculan en el servidor.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertVehicleRequest {
    pub id: Option<Uuid>,

    pub vin: String,

    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    pub model_year: i32,

    #[validate(length(max = 100))]
    pub trim: Option<String>,

    #[validate(length(max = 20))]
    pub license_plate: Option<String>,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    pub registration_jurisdiction: String,

    #[serde(default)]
    pub fuel_type: Option<FuelType>,

    pub vehicle_type: VehicleType,

    pub purpose: VehiclePurpose,

    /// Los formularios mandan "" para fechas sin setear
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub last_registration_renewal: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub last_emissions_test: Option<NaiveDate>,
}

impl UpsertVehicleRequest {
    /// Validación completa: atributos del derive más las reglas que
    /// dependen del reloj o del recorte de espacios, acumuladas en el
    /// mismo set de errores por campo.
    pub fn validate_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if let Err(e) = validate_vin(&self.vin) {
            errors.add("vin", e);
        }
        if let Err(e) = validate_jurisdiction(&self.registration_jurisdiction) {
            errors.add("registration_jurisdiction", e);
        }
        if let Err(e) = validate_model_year(self.model_year) {
            errors.add("model_year", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Deserializar una fecha opcional tratando "" y blancos como ausente
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub model_year: i32,
    pub trim: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub registration_jurisdiction: String,
    pub fuel_type: String,
    pub vehicle_type: String,
    pub purpose: String,
    pub last_registration_renewal: Option<NaiveDate>,
    pub registration_due_on: Option<NaiveDate>,
    pub last_emissions_test: Option<NaiveDate>,
    pub emissions_due_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            vin: vehicle.vin,
            make: vehicle.make,
            model: vehicle.model,
            model_year: vehicle.model_year,
            trim: vehicle.trim,
            license_plate: vehicle.license_plate,
            color: vehicle.color,
            mileage: vehicle.mileage,
            registration_jurisdiction: vehicle.registration_jurisdiction,
            fuel_type: vehicle.fuel_type,
            vehicle_type: vehicle.vehicle_type,
            purpose: vehicle.purpose,
            last_registration_renewal: vehicle.last_registration_renewal,
            registration_due_on: vehicle.registration_due_on,
            last_emissions_test: vehicle.last_emissions_test,
            emissions_due_on: vehicle.emissions_due_on,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

/// Vista de detalle: vehículo + reminders + historial de servicio
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    pub vehicle: VehicleResponse,
    pub reminders: Vec<ReminderResponse>,
    pub maintenance_events: Vec<MaintenanceEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_payload() -> serde_json::Value {
        json!({
            "vin": "1HGBH41JXMN109186",
            "make": "Honda",
            "model": "Civic",
            "model_year": 2021,
            "registration_jurisdiction": "CA",
            "fuel_type": "GAS",
            "vehicle_type": "SEDAN",
            "purpose": "DAILY_DRIVER",
            "last_registration_renewal": "2025-02-12"
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let request: UpsertVehicleRequest = serde_json::from_value(base_payload()).unwrap();
        assert!(request.validate_fields().is_ok());
        assert_eq!(
            request.last_registration_renewal,
            NaiveDate::from_ymd_opt(2025, 2, 12)
        );
    }

    #[test]
    fn test_empty_string_date_becomes_none() {
        let mut payload = base_payload();
        payload["last_registration_renewal"] = json!("");
        payload["last_emissions_test"] = json!("   ");
        let request: UpsertVehicleRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.last_registration_renewal, None);
        assert_eq!(request.last_emissions_test, None);
    }

    #[test]
    fn test_missing_date_fields_default_to_none() {
        let request: UpsertVehicleRequest = serde_json::from_value(json!({
            "vin": "1HGBH41JXMN109186",
            "make": "Honda",
            "model": "Civic",
            "model_year": 2021,
            "registration_jurisdiction": "CA",
            "vehicle_type": "SEDAN",
            "purpose": "DAILY_DRIVER"
        }))
        .unwrap();
        assert_eq!(request.last_registration_renewal, None);
        assert_eq!(request.fuel_type, None);
    }

    #[test]
    fn test_field_errors_are_accumulated_per_field() {
        let mut payload = base_payload();
        payload["vin"] = json!("SHORT");
        payload["registration_jurisdiction"] = json!("CAL");
        payload["model_year"] = json!(1900);
        let request: UpsertVehicleRequest = serde_json::from_value(payload).unwrap();

        let errors = request.validate_fields().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("vin"));
        assert!(fields.contains_key("registration_jurisdiction"));
        assert!(fields.contains_key("model_year"));
    }

    #[test]
    fn test_negative_mileage_rejected() {
        let mut payload = base_payload();
        payload["mileage"] = json!(-5);
        let request: UpsertVehicleRequest = serde_json::from_value(payload).unwrap();
        let errors = request.validate_fields().unwrap_err();
        assert!(errors.field_errors().contains_key("mileage"));
    }

    #[test]
    fn test_unknown_fuel_type_fails_deserialization() {
        let mut payload = base_payload();
        payload["fuel_type"] = json!("STEAM");
        assert!(serde_json::from_value::<UpsertVehicleRequest>(payload).is_err());
    }
}
