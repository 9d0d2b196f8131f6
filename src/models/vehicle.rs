//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, los enums de clasificación y el
//! draft de escritura. Mapea exactamente a la tabla `vehicles` del schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de combustible del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Gas,
    Diesel,
    Hybrid,
    Ev,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gas => "GAS",
            FuelType::Diesel => "DIESEL",
            FuelType::Hybrid => "HYBRID",
            FuelType::Ev => "EV",
        }
    }
}

impl Default for FuelType {
    fn default() -> Self {
        FuelType::Gas
    }
}

/// Categoría de carrocería
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Sedan,
    Coupe,
    SportsCar,
    Suv,
    Motorcycle,
    Crossover,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "SEDAN",
            VehicleType::Coupe => "COUPE",
            VehicleType::SportsCar => "SPORTS_CAR",
            VehicleType::Suv => "SUV",
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Crossover => "CROSSOVER",
        }
    }
}

/// Uso declarado del vehículo - sin efecto en la proyección
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehiclePurpose {
    DailyDriver,
    Commuter,
    Weekender,
    UtilityVehicle,
}

impl VehiclePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehiclePurpose::DailyDriver => "DAILY_DRIVER",
            VehiclePurpose::Commuter => "COMMUTER",
            VehiclePurpose::Weekender => "WEEKENDER",
            VehiclePurpose::UtilityVehicle => "UTILITY_VEHICLE",
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
///
/// `registration_due_on` y `emissions_due_on` son campos derivados: siempre
/// se recalculan con el proyector en el momento de escribir, nunca los fija
/// el caller directamente.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
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

/// Datos listos para persistir un vehículo (create o update)
///
/// Solo el workflow de upsert construye este struct, después de validar el
/// payload y de recalcular las fechas derivadas con el proyector.
#[derive(Debug, Clone)]
pub struct VehicleDraft {
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
}
