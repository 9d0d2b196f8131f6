//! DTOs de Reminder

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reminder::{Reminder, ReminderChannel, ReminderKind};

/// Request para agendar un reminder manual
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleReminderRequest {
    pub vehicle_id: Uuid,

    pub kind: ReminderKind,

    pub due_on: NaiveDate,

    /// Default 30 si no viene
    #[validate(range(min = 1, max = 120))]
    pub lead_time_days: Option<i32>,

    /// Default {PUSH} si no viene; vacío explícito es inválido
    #[validate(length(min = 1))]
    pub channels: Option<Vec<ReminderChannel>>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Query de la ventana de vencimientos
#[derive(Debug, Deserialize)]
pub struct DueWindowQuery {
    pub within_days: Option<i64>,
}

/// Response de reminder con los canales ya decodificados
#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub due_on: NaiveDate,
    pub lead_time_days: i32,
    pub notify_on: Option<NaiveDate>,
    pub satisfied_at: Option<DateTime<Utc>>,
    pub is_open: bool,
    pub channels: Vec<ReminderChannel>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderResponse {
    fn from(reminder: Reminder) -> Self {
        let channels = reminder.channels();
        let is_open = reminder.is_open_at(Utc::now());
        Self {
            id: reminder.id,
            owner_id: reminder.owner_id,
            vehicle_id: reminder.vehicle_id,
            kind: reminder.kind,
            due_on: reminder.due_on,
            lead_time_days: reminder.lead_time_days,
            notify_on: reminder.notify_on,
            satisfied_at: reminder.satisfied_at,
            is_open,
            channels,
            notes: reminder.notes,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_request_deserializes_enums() {
        let request: ScheduleReminderRequest = serde_json::from_value(json!({
            "vehicle_id": "8f14e45f-ea4c-4e1e-a2a5-0b1f4a3c9d21",
            "kind": "REGISTRATION",
            "due_on": "2026-02-12",
            "channels": ["PUSH", "EMAIL"]
        }))
        .unwrap();
        assert_eq!(request.kind, ReminderKind::Registration);
        assert_eq!(
            request.channels,
            Some(vec![ReminderChannel::Push, ReminderChannel::Email])
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_lead_time_out_of_range_rejected() {
        let request: ScheduleReminderRequest = serde_json::from_value(json!({
            "vehicle_id": "8f14e45f-ea4c-4e1e-a2a5-0b1f4a3c9d21",
            "kind": "EMISSIONS",
            "due_on": "2026-02-12",
            "lead_time_days": 200
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_explicit_empty_channels_rejected() {
        let request: ScheduleReminderRequest = serde_json::from_value(json!({
            "vehicle_id": "8f14e45f-ea4c-4e1e-a2a5-0b1f4a3c9d21",
            "kind": "SERVICE",
            "due_on": "2026-02-12",
            "channels": []
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
