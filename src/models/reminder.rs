//! Modelo de Reminder
//!
//! Un reminder representa una obligación agendada (registro, emisiones o
//! servicio) con su fecha límite y la fecha de notificación derivada.
//! Los canales de entrega se persisten como texto JSON en `channels_raw`
//! y se parsean de vuelta con fallback a conjunto vacío.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de obligación del reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderKind {
    Registration,
    Emissions,
    Service,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Registration => "REGISTRATION",
            ReminderKind::Emissions => "EMISSIONS",
            ReminderKind::Service => "SERVICE",
        }
    }
}

/// Canal de entrega de la notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderChannel {
    Push,
    Email,
    Sms,
}

impl ReminderChannel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PUSH" => Some(ReminderChannel::Push),
            "EMAIL" => Some(ReminderChannel::Email),
            "SMS" => Some(ReminderChannel::Sms),
            _ => None,
        }
    }
}

/// Reminder principal - mapea exactamente a la tabla reminders
#[derive(Debug, Clone, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub due_on: NaiveDate,
    pub lead_time_days: i32,
    pub notify_on: Option<NaiveDate>,
    pub satisfied_at: Option<DateTime<Utc>>,
    pub channels_raw: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Canales decodificados desde la representación persistida
    pub fn channels(&self) -> Vec<ReminderChannel> {
        parse_channels(&self.channels_raw)
    }

    /// ¿Sigue pendiente en `now`?
    ///
    /// Un `satisfied_at` en el futuro todavía cuenta como abierto
    /// (pre-acknowledgement). Las queries sobre la tabla aplican esta
    /// misma regla.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        match self.satisfied_at {
            None => true,
            Some(satisfied_at) => satisfied_at > now,
        }
    }
}

/// Serializar canales a la representación de texto persistida
pub fn encode_channels(channels: &[ReminderChannel]) -> String {
    serde_json::to_string(channels).unwrap_or_else(|_| "[]".to_string())
}

/// Parsear canales desde texto persistido
///
/// Tags desconocidos se filtran; texto legacy no parseable produce el
/// conjunto vacío en lugar de un error.
pub fn parse_channels(raw: &str) -> Vec<ReminderChannel> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values
            .iter()
            .filter_map(|value| ReminderChannel::parse(value))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_round_trip() {
        let channels = vec![ReminderChannel::Push, ReminderChannel::Email];
        let raw = encode_channels(&channels);
        assert_eq!(parse_channels(&raw), channels);
    }

    #[test]
    fn test_parse_channels_filters_unknown_tags() {
        let parsed = parse_channels(r#"["PUSH", "CARRIER_PIGEON", "SMS"]"#);
        assert_eq!(parsed, vec![ReminderChannel::Push, ReminderChannel::Sms]);
    }

    #[test]
    fn test_parse_channels_legacy_garbage_yields_empty_set() {
        assert!(parse_channels("push,email").is_empty());
        assert!(parse_channels("").is_empty());
        assert!(parse_channels("{\"push\":true}").is_empty());
    }

    #[test]
    fn test_encode_channels_empty() {
        assert_eq!(encode_channels(&[]), "[]");
    }
}
