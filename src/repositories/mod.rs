//! Repositorios de acceso a datos
//!
//! Capa de persistencia sobre sqlx. Todas las consultas están acotadas por
//! `owner_id`: un recurso de otro owner se comporta como inexistente.

pub mod maintenance_repository;
pub mod reminder_repository;
pub mod vehicle_repository;
