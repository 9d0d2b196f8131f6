//! Utilidades de validación
//!
//! Funciones helper para las reglas de validación que no se pueden
//! expresar con atributos estáticos del derive de `validator`.

use chrono::{Datelike, Utc};
use validator::ValidationError;

/// Año mínimo aceptado para `model_year`
pub const MIN_MODEL_YEAR: i32 = 1980;

/// Validar un VIN: exactamente 17 caracteres después de recortar espacios
pub fn validate_vin(vin: &str) -> Result<(), ValidationError> {
    if vin.trim().chars().count() != 17 {
        let mut error = ValidationError::new("vin");
        error.message = Some("VIN must be exactly 17 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Validar un código de jurisdicción de 2 letras (ej. "CA")
pub fn validate_jurisdiction(code: &str) -> Result<(), ValidationError> {
    if code.trim().chars().count() != 2 {
        let mut error = ValidationError::new("jurisdiction");
        error.message = Some("Jurisdiction must be a 2-letter code".into());
        return Err(error);
    }
    Ok(())
}

/// Validar el año de modelo: rango [1980, año actual + 1]
///
/// El límite superior depende del reloj, por eso no puede ser un
/// atributo `range` estático.
pub fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 1;
    if year < MIN_MODEL_YEAR || year > max_year {
        let mut error = ValidationError::new("model_year");
        error.message = Some("Model year is out of the accepted range".into());
        error.add_param("min".into(), &MIN_MODEL_YEAR);
        error.add_param("max".into(), &max_year);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vin_accepts_17_chars() {
        assert!(validate_vin("1HGBH41JXMN109186").is_ok());
    }

    #[test]
    fn test_validate_vin_trims_whitespace() {
        assert!(validate_vin("  1HGBH41JXMN109186  ").is_ok());
        assert!(validate_vin("  SHORT  ").is_err());
    }

    #[test]
    fn test_validate_vin_rejects_wrong_length() {
        assert!(validate_vin("1HGBH41JXMN10918").is_err());
        assert!(validate_vin("1HGBH41JXMN1091860").is_err());
        assert!(validate_vin("").is_err());
    }

    #[test]
    fn test_validate_jurisdiction() {
        assert!(validate_jurisdiction("CA").is_ok());
        assert!(validate_jurisdiction("ca").is_ok());
        assert!(validate_jurisdiction("CAL").is_err());
        assert!(validate_jurisdiction("C").is_err());
    }

    #[test]
    fn test_validate_model_year_bounds() {
        let next_year = Utc::now().year() + 1;
        assert!(validate_model_year(1980).is_ok());
        assert!(validate_model_year(next_year).is_ok());
        assert!(validate_model_year(1979).is_err());
        assert!(validate_model_year(next_year + 1).is_err());
    }
}
