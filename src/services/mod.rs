//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: la tabla de
//! reglas de compliance, el proyector puro de vencimientos y el scheduler
//! de reminders.

pub mod compliance_projector;
pub mod compliance_rules;
pub mod reminder_scheduler;
