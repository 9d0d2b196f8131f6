//! DTOs de la API
//!
//! Requests (con validación por campo) y responses de cada recurso.

pub mod api;
pub mod maintenance_dto;
pub mod reminder_dto;
pub mod vehicle_dto;
