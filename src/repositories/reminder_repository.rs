use crate::models::reminder::Reminder;
use crate::utils::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Datos para insertar un reminder nuevo
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub owner_id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub due_on: NaiveDate,
    pub lead_time_days: i32,
    pub notify_on: Option<NaiveDate>,
    pub channels_raw: String,
    pub notes: Option<String>,
}

pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &ReminderDraft) -> Result<Reminder, AppError> {
        let id = Uuid::new_v4();

        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (
                id, owner_id, vehicle_id, kind, due_on, lead_time_days,
                notify_on, channels_raw, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.owner_id)
        .bind(draft.vehicle_id)
        .bind(&draft.kind)
        .bind(draft.due_on)
        .bind(draft.lead_time_days)
        .bind(draft.notify_on)
        .bind(&draft.channels_raw)
        .bind(&draft.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(reminder)
    }

    /// Reminders con vencimiento dentro de `[today, window_end]`
    ///
    /// Excluye los efectivamente satisfechos. Un `satisfied_at` en el futuro
    /// todavía cuenta como pendiente (pre-acknowledgement deliberado).
    pub async fn find_due_between(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        window_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>, AppError> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE owner_id = $1
              AND due_on >= $2
              AND due_on <= $3
              AND (satisfied_at IS NULL OR satisfied_at > $4)
            ORDER BY due_on ASC
            "#,
        )
        .bind(owner_id)
        .bind(today)
        .bind(window_end)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders)
    }

    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Reminder>, AppError> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE vehicle_id = $1 ORDER BY due_on ASC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders)
    }

    /// Marcar satisfecho de forma idempotente
    ///
    /// COALESCE conserva el primer `satisfied_at`; la segunda llamada es un
    /// no-op que devuelve el mismo estado terminal.
    pub async fn mark_satisfied(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Reminder>, AppError> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders
            SET satisfied_at = COALESCE(satisfied_at, NOW()),
                notify_on = NULL,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reminder)
    }

    /// ¿Existe ya un reminder abierto para la misma obligación?
    ///
    /// Clave de deduplicación del auto-scheduling: (vehicle_id, kind, due_on)
    /// abierto. "Abierto" usa la misma regla que la ventana de vencimientos:
    /// sin satisfacer, o satisfecho con timestamp futuro.
    pub async fn open_obligation_exists(
        &self,
        vehicle_id: Uuid,
        kind: &str,
        due_on: NaiveDate,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reminders
                WHERE vehicle_id = $1 AND kind = $2 AND due_on = $3
                  AND (satisfied_at IS NULL OR satisfied_at > NOW())
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(kind)
        .bind(due_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Reconciliar los reminders abiertos de una obligación con la
    /// proyección vigente
    ///
    /// Una edición del vehículo puede mover la fecha proyectada: los
    /// reminders abiertos del kind se reapuntan al nuevo `due_on` (con el
    /// `notify_on` recalculado a partir del lead time de cada fila). Si la
    /// obligación desapareció de la proyección, los abiertos se eliminan.
    /// Devuelve la cantidad de filas tocadas.
    pub async fn reconcile_open_obligation(
        &self,
        vehicle_id: Uuid,
        kind: &str,
        due_on: Option<NaiveDate>,
    ) -> Result<u64, AppError> {
        let result = match due_on {
            Some(due_on) => {
                sqlx::query(
                    r#"
                    UPDATE reminders
                    SET due_on = $3,
                        notify_on = $3 - lead_time_days,
                        updated_at = NOW()
                    WHERE vehicle_id = $1 AND kind = $2
                      AND (satisfied_at IS NULL OR satisfied_at > NOW())
                      AND due_on <> $3
                    "#,
                )
                .bind(vehicle_id)
                .bind(kind)
                .bind(due_on)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    DELETE FROM reminders
                    WHERE vehicle_id = $1 AND kind = $2
                      AND (satisfied_at IS NULL OR satisfied_at > NOW())
                    "#,
                )
                .bind(vehicle_id)
                .bind(kind)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(due_on: NaiveDate, satisfied_at: Option<DateTime<Utc>>) -> Reminder {
        let now = Utc::now();
        Reminder {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            kind: "REGISTRATION".to_string(),
            due_on,
            lead_time_days: 30,
            notify_on: Some(due_on - Duration::days(30)),
            satisfied_at,
            channels_raw: "[\"PUSH\"]".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    // Misma regla que el SET del UPDATE de mark_satisfied
    fn satisfy_at(current: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        current.or(Some(now))
    }

    #[test]
    fn test_window_predicate_filters_and_orders() {
        let now = Utc::now();
        let today = date(2025, 6, 1);
        let window_end = date(2025, 8, 30);

        let in_window_late = reminder(date(2025, 8, 15), None);
        let in_window_early = reminder(date(2025, 6, 10), None);
        let before_window = reminder(date(2025, 5, 20), None);
        let after_window = reminder(date(2025, 9, 15), None);
        let satisfied = reminder(date(2025, 7, 1), Some(now - Duration::hours(1)));

        let mut due: Vec<&Reminder> = [
            &in_window_late,
            &in_window_early,
            &before_window,
            &after_window,
            &satisfied,
        ]
        .into_iter()
        .filter(|r| r.is_open_at(now) && r.due_on >= today && r.due_on <= window_end)
        .collect();
        due.sort_by_key(|r| r.due_on);

        let ids: Vec<Uuid> = due.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![in_window_early.id, in_window_late.id]);
    }

    #[test]
    fn test_future_satisfied_at_still_counts_as_open() {
        let now = Utc::now();
        let pre_acknowledged = reminder(date(2025, 7, 1), Some(now + Duration::days(3)));
        assert!(pre_acknowledged.is_open_at(now));

        let already_satisfied = reminder(date(2025, 7, 1), Some(now - Duration::days(3)));
        assert!(!already_satisfied.is_open_at(now));
    }

    #[test]
    fn test_satisfy_keeps_first_timestamp() {
        let first = Utc::now();
        let second = first + Duration::hours(2);

        let once = satisfy_at(None, first);
        assert_eq!(once, Some(first));

        // La segunda llamada es un no-op sobre el mismo estado terminal
        let twice = satisfy_at(once, second);
        assert_eq!(twice, Some(first));
    }

    #[test]
    fn test_reconciliation_targets_only_stale_open_reminders() {
        let now = Utc::now();
        let new_due = date(2026, 3, 1);

        let stale_open = reminder(date(2026, 2, 12), None);
        let already_current = reminder(new_due, None);
        let closed = reminder(date(2026, 2, 12), Some(now - Duration::days(1)));

        // Mismo criterio que el WHERE del UPDATE de reconciliación
        let needs_retarget =
            |r: &Reminder| r.is_open_at(now) && r.due_on != new_due;

        assert!(needs_retarget(&stale_open));
        assert!(!needs_retarget(&already_current));
        assert!(!needs_retarget(&closed));
    }
}
