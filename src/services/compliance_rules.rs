//! Tabla de reglas de compliance por jurisdicción
//!
//! Datos de política puros, sin comportamiento: intervalo de registro,
//! programa de emisiones (si existe) y exenciones por combustible.
//! La regla por defecto es una entrada normal de la tabla bajo la clave
//! comodín `"*"`, así el lookup es total y sin ramas ocultas.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Clave comodín de la regla por defecto
pub const DEFAULT_RULE_KEY: &str = "*";

/// Política inmutable de una jurisdicción
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRule {
    /// Meses entre renovaciones de registro
    pub registration_interval_months: u32,
    /// Meses entre pruebas de emisiones; `None` = sin programa de emisiones
    pub emissions_interval_months: Option<u32>,
    /// Edad mínima del vehículo (años) para entrar al programa de emisiones
    pub emissions_start_age_years: Option<i32>,
    /// Combustibles exentos aunque el programa aplique
    pub emissions_exempt_fuel_types: &'static [&'static str],
}

lazy_static! {
    static ref COMPLIANCE_RULES: HashMap<&'static str, ComplianceRule> = {
        let mut rules = HashMap::new();
        rules.insert(
            "CA",
            ComplianceRule {
                registration_interval_months: 12,
                emissions_interval_months: Some(24),
                emissions_start_age_years: Some(4),
                emissions_exempt_fuel_types: &["EV"],
            },
        );
        rules.insert(
            "NY",
            ComplianceRule {
                registration_interval_months: 12,
                emissions_interval_months: Some(12),
                emissions_start_age_years: Some(2),
                emissions_exempt_fuel_types: &["EV"],
            },
        );
        rules.insert(
            "TX",
            ComplianceRule {
                registration_interval_months: 12,
                emissions_interval_months: Some(12),
                emissions_start_age_years: Some(2),
                emissions_exempt_fuel_types: &["EV", "DIESEL"],
            },
        );
        rules.insert(
            "WA",
            ComplianceRule {
                registration_interval_months: 12,
                emissions_interval_months: None,
                emissions_start_age_years: None,
                emissions_exempt_fuel_types: &[],
            },
        );
        rules.insert(
            DEFAULT_RULE_KEY,
            ComplianceRule {
                registration_interval_months: 12,
                emissions_interval_months: Some(24),
                emissions_start_age_years: Some(4),
                emissions_exempt_fuel_types: &[],
            },
        );
        rules
    };
}

/// Obtener la regla para una jurisdicción
///
/// Función total: una jurisdicción desconocida resuelve a la entrada
/// comodín, nunca a un error.
pub fn rule_for(jurisdiction: &str) -> &'static ComplianceRule {
    let table: &'static HashMap<&'static str, ComplianceRule> = &COMPLIANCE_RULES;
    table
        .get(jurisdiction)
        .unwrap_or_else(|| &table[DEFAULT_RULE_KEY])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_jurisdiction_returns_its_rule() {
        let rule = rule_for("CA");
        assert_eq!(rule.registration_interval_months, 12);
        assert_eq!(rule.emissions_interval_months, Some(24));
        assert_eq!(rule.emissions_start_age_years, Some(4));
        assert_eq!(rule.emissions_exempt_fuel_types, &["EV"]);
    }

    #[test]
    fn test_unknown_jurisdiction_falls_back_to_wildcard() {
        let rule = rule_for("ZZ");
        assert_eq!(rule, rule_for(DEFAULT_RULE_KEY));
        assert_eq!(rule.registration_interval_months, 12);
        assert_eq!(rule.emissions_interval_months, Some(24));
        assert!(rule.emissions_exempt_fuel_types.is_empty());
    }

    #[test]
    fn test_jurisdiction_without_emissions_program() {
        let rule = rule_for("WA");
        assert_eq!(rule.emissions_interval_months, None);
        assert_eq!(rule.emissions_start_age_years, None);
    }
}
