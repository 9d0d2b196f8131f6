//! DTOs de mantenimiento

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request para registrar un evento de servicio
#[derive(Debug, Deserialize, Validate)]
pub struct LogMaintenanceRequest {
    pub vehicle_id: Uuid,

    pub service_date: NaiveDate,

    #[validate(length(min = 1, max = 120))]
    pub headline: String,

    #[validate(range(min = 0))]
    pub odometer: Option<i32>,

    #[validate(range(min = 0))]
    pub cost_cents: Option<i32>,

    #[validate(length(max = 120))]
    pub location: Option<String>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
