use crate::models::vehicle::{Vehicle, VehicleDraft};
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &VehicleDraft) -> Result<Vehicle, AppError> {
        let id = Uuid::new_v4();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, owner_id, vin, make, model, model_year, trim, license_plate,
                color, mileage, registration_jurisdiction, fuel_type, vehicle_type,
                purpose, last_registration_renewal, registration_due_on,
                last_emissions_test, emissions_due_on, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.owner_id)
        .bind(&draft.vin)
        .bind(&draft.make)
        .bind(&draft.model)
        .bind(draft.model_year)
        .bind(&draft.trim)
        .bind(&draft.license_plate)
        .bind(&draft.color)
        .bind(draft.mileage)
        .bind(&draft.registration_jurisdiction)
        .bind(&draft.fuel_type)
        .bind(&draft.vehicle_type)
        .bind(&draft.purpose)
        .bind(draft.last_registration_renewal)
        .bind(draft.registration_due_on)
        .bind(draft.last_emissions_test)
        .bind(draft.emissions_due_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_vin_conflict(e, &draft.vin))?;

        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, draft: &VehicleDraft) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                vin = $2, make = $3, model = $4, model_year = $5, trim = $6,
                license_plate = $7, color = $8, mileage = $9,
                registration_jurisdiction = $10, fuel_type = $11,
                vehicle_type = $12, purpose = $13,
                last_registration_renewal = $14, registration_due_on = $15,
                last_emissions_test = $16, emissions_due_on = $17,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $18
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.vin)
        .bind(&draft.make)
        .bind(&draft.model)
        .bind(draft.model_year)
        .bind(&draft.trim)
        .bind(&draft.license_plate)
        .bind(&draft.color)
        .bind(draft.mileage)
        .bind(&draft.registration_jurisdiction)
        .bind(&draft.fuel_type)
        .bind(&draft.vehicle_type)
        .bind(&draft.purpose)
        .bind(draft.last_registration_renewal)
        .bind(draft.registration_due_on)
        .bind(draft.last_emissions_test)
        .bind(draft.emissions_due_on)
        .bind(draft.owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_vin_conflict(e, &draft.vin))?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_vin(&self, owner_id: Uuid, vin: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE vin = $1 AND owner_id = $2",
        )
        .bind(vin)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Listado del dashboard: más nuevos primero, luego por última edición
    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 ORDER BY model_year DESC, updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Borrar un vehículo junto con sus reminders y eventos de mantenimiento
    ///
    /// Transacción explícita de varios pasos: primero los hijos, después la
    /// fila del vehículo. Devuelve la cantidad de vehículos borrados (0 o 1).
    pub async fn delete_with_children(&self, owner_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM reminders WHERE vehicle_id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM maintenance_events
            WHERE vehicle_id IN (SELECT id FROM vehicles WHERE id = $1 AND owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }
}

/// Código SQLSTATE de violación de constraint único en Postgres
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Traducir la violación del índice único (owner_id, vin) a DuplicateVin
///
/// El constraint de la base es la autoridad ante dos creates concurrentes
/// con el mismo VIN; acá solo se clasifica el error resultante.
fn translate_vin_conflict(error: sqlx::Error, vin: &str) -> AppError {
    match error {
        sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION_CODE) => {
            AppError::DuplicateVin(format!(
                "A vehicle with VIN '{}' already exists for this owner",
                vin
            ))
        }
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error with code {}", self.code)
        }
    }

    impl StdError for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code }))
    }

    #[test]
    fn test_unique_violation_becomes_duplicate_vin() {
        let translated = translate_vin_conflict(db_error("23505"), "1HGBH41JXMN109186");
        match translated {
            AppError::DuplicateVin(message) => {
                assert!(message.contains("1HGBH41JXMN109186"));
            }
            other => panic!("expected DuplicateVin, got {:?}", other),
        }
    }

    #[test]
    fn test_other_db_codes_pass_through() {
        // 23503 = foreign key violation
        let translated = translate_vin_conflict(db_error("23503"), "1HGBH41JXMN109186");
        assert!(matches!(translated, AppError::Database(_)));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let translated = translate_vin_conflict(sqlx::Error::RowNotFound, "1HGBH41JXMN109186");
        assert!(matches!(translated, AppError::Database(_)));
    }
}
