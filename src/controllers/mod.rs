//! Controllers del patrón MVC
//!
//! Orquestan validación, reglas de negocio y repositorios para cada recurso.

pub mod maintenance_controller;
pub mod reminder_controller;
pub mod vehicle_controller;
