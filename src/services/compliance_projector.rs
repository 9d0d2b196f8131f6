//! Proyector de compliance
//!
//! Función pura que calcula las próximas fechas de vencimiento de registro
//! y emisiones de un vehículo a partir de su jurisdicción, año de modelo,
//! combustible y últimas fechas conocidas. Sin I/O ni efectos: el mismo
//! input (incluida la fecha de referencia) produce siempre el mismo output,
//! por eso los tests pasan la fecha de referencia explícita en vez de usar
//! el reloj.

use chrono::{Datelike, Months, NaiveDate};

use crate::services::compliance_rules::rule_for;
use crate::utils::errors::AppError;

/// Input de la proyección
#[derive(Debug, Clone)]
pub struct ComplianceInput<'a> {
    pub jurisdiction: &'a str,
    pub model_year: i32,
    pub fuel_type: &'a str,
    /// Última renovación de registro. El caller resuelve los nulls antes
    /// de proyectar (ej. sustituyendo la fecha actual en un alta nueva);
    /// el proyector no adivina.
    pub last_registration_on: Option<NaiveDate>,
    pub last_emissions_on: Option<NaiveDate>,
    pub reference_date: NaiveDate,
}

/// Resultado de la proyección
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceProjection {
    pub registration_due_on: NaiveDate,
    pub emissions_due_on: Option<NaiveDate>,
    pub emissions_required: bool,
}

/// Avanzar una fecha N meses calendario con clamping del día
///
/// El día del mes se ajusta al último día válido del mes resultante:
/// 31 de enero + 1 mes = 28/29 de febrero, no 3 de marzo.
pub fn advance_months(date: NaiveDate, months: u32) -> NaiveDate {
    // chrono clampa el día al agregar Months; el overflow de rango de
    // fechas no es alcanzable con los intervalos de la tabla de reglas
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Calcular la proyección de compliance de un vehículo
pub fn project(input: &ComplianceInput) -> Result<ComplianceProjection, AppError> {
    let rule = rule_for(input.jurisdiction);

    let last_registration = input.last_registration_on.ok_or_else(|| {
        AppError::ProjectionInput(
            "Cannot project registration without a baseline renewal date".to_string(),
        )
    })?;

    let registration_due_on = advance_months(last_registration, rule.registration_interval_months);

    let mut emissions_due_on = None;
    let mut emissions_required = false;

    if let (Some(interval), Some(start_age)) = (
        rule.emissions_interval_months,
        rule.emissions_start_age_years,
    ) {
        // Límite de edad inclusivo: un vehículo que justo cumple la edad
        // de inicio ya entra al programa
        let old_enough = input.model_year <= input.reference_date.year() - start_age;
        let exempt = rule
            .emissions_exempt_fuel_types
            .iter()
            .any(|tag| *tag == input.fuel_type);

        if old_enough && !exempt {
            emissions_required = true;
            let baseline = input.last_emissions_on.unwrap_or(last_registration);
            emissions_due_on = Some(advance_months(baseline, interval));
        }
    }

    Ok(ComplianceProjection {
        registration_due_on,
        emissions_due_on,
        emissions_required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_months_clamps_to_leap_february() {
        assert_eq!(advance_months(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn test_advance_months_clamps_to_short_february() {
        assert_eq!(advance_months(date(2023, 1, 31), 1), date(2023, 2, 28));
    }

    #[test]
    fn test_advance_months_rolls_year_boundary() {
        assert_eq!(advance_months(date(2024, 11, 30), 3), date(2025, 2, 28));
    }

    #[test]
    fn test_advance_months_plain_case() {
        assert_eq!(advance_months(date(2025, 2, 12), 12), date(2026, 2, 12));
    }

    #[test]
    fn test_registration_projection_ca() {
        let projection = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2021,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 2, 12)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert_eq!(projection.registration_due_on, date(2026, 2, 12));
    }

    #[test]
    fn test_ev_exempt_in_ca() {
        let projection = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2020,
            fuel_type: "EV",
            last_registration_on: Some(date(2025, 6, 1)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert_eq!(projection.emissions_due_on, None);
        assert!(!projection.emissions_required);
    }

    #[test]
    fn test_age_gate_is_inclusive() {
        // CA arranca emisiones a los 4 años: con referencia en 2025,
        // model_year 2021 califica (2021 <= 2025 - 4), 2022 no
        let qualifying = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2021,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 2, 12)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert!(qualifying.emissions_required);
        assert!(qualifying.emissions_due_on.is_some());

        let too_new = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2022,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 2, 12)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert!(!too_new.emissions_required);
        assert_eq!(too_new.emissions_due_on, None);
    }

    #[test]
    fn test_emissions_baseline_prefers_last_test() {
        let projection = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2018,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 1, 10)),
            last_emissions_on: Some(date(2024, 9, 3)),
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        // 24 meses desde la última prueba, no desde el registro
        assert_eq!(projection.emissions_due_on, Some(date(2026, 9, 3)));
    }

    #[test]
    fn test_emissions_baseline_falls_back_to_registration() {
        let projection = project(&ComplianceInput {
            jurisdiction: "NY",
            model_year: 2018,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 1, 31)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert_eq!(projection.emissions_due_on, Some(date(2026, 1, 31)));
    }

    #[test]
    fn test_no_emissions_program_jurisdiction() {
        let projection = project(&ComplianceInput {
            jurisdiction: "WA",
            model_year: 2005,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 3, 15)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert_eq!(projection.registration_due_on, date(2026, 3, 15));
        assert_eq!(projection.emissions_due_on, None);
        assert!(!projection.emissions_required);
    }

    #[test]
    fn test_unknown_jurisdiction_uses_default_rule() {
        let projection = project(&ComplianceInput {
            jurisdiction: "ZZ",
            model_year: 2015,
            fuel_type: "EV",
            last_registration_on: Some(date(2025, 4, 1)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        // La regla por defecto no exime a los EV
        assert!(projection.emissions_required);
        assert_eq!(projection.emissions_due_on, Some(date(2027, 4, 1)));
    }

    #[test]
    fn test_missing_registration_baseline_is_an_error() {
        let result = project(&ComplianceInput {
            jurisdiction: "CA",
            model_year: 2021,
            fuel_type: "GAS",
            last_registration_on: None,
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        });
        assert!(matches!(result, Err(AppError::ProjectionInput(_))));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let input = ComplianceInput {
            jurisdiction: "TX",
            model_year: 2019,
            fuel_type: "GAS",
            last_registration_on: Some(date(2025, 5, 31)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        };
        assert_eq!(project(&input).unwrap(), project(&input).unwrap());
    }

    #[test]
    fn test_diesel_exempt_in_tx() {
        let projection = project(&ComplianceInput {
            jurisdiction: "TX",
            model_year: 2015,
            fuel_type: "DIESEL",
            last_registration_on: Some(date(2025, 1, 15)),
            last_emissions_on: None,
            reference_date: date(2025, 6, 1),
        })
        .unwrap();
        assert!(!projection.emissions_required);
        assert_eq!(projection.emissions_due_on, None);
    }
}
