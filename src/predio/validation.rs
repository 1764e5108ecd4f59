//! Input validation for document-generation requests.
//!
//! Structural problems (missing fields, wrong types, empty record list) are
//! schema failures; pattern and range violations on well-formed fields are
//! format failures. Both map to HTTP 422, with the kind reported in the
//! error envelope.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::predio::models::{DatosRequest, Predio};

lazy_static! {
    static ref CLAVE_CATASTRAL_RE: Regex =
        Regex::new(r"^\d{3}-\d{2}-\d{3}-\d{2}-\d{2}-[A-Z0-9]+$").unwrap();
}

/// Terminal validation failure for a request.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    #[error("{0}")]
    Schema(String),
    #[error("{0}")]
    Formato(String),
}

impl ValidationFailure {
    /// Error kind reported in the response envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationFailure::Schema(_) => "SchemaError",
            ValidationFailure::Formato(_) => "FormatError",
        }
    }
}

/// Validation error with detailed, user-friendly messages.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message in Spanish
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{label} no puede estar vacío")).with_suggestion(format!(
            "Proporcione {} con un valor válido",
            label.to_lowercase()
        ))
    }

    /// Create error for an invalid cadastral key
    pub fn invalid_clave_catastral(field: &str, value: &str) -> Self {
        Self::new(
            field,
            format!("La clave catastral '{value}' no tiene el formato esperado"),
        )
        .with_suggestion("Use el formato NNN-NN-NNN-NN-NN-XXX, por ejemplo: 123-45-678-90-12-AB1")
    }

    /// Create error for a negative monetary or area value
    pub fn negative_value(field: &str, label: &str) -> Self {
        Self::new(field, format!("{label} no puede ser negativo"))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get the combined message for the HTTP error detail
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validación fallida: {} error(es) encontrado(s)",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    /// Convert to Result - Ok if no errors, Err with formatted message if errors exist
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate the fixed cadastral-key pattern
pub fn validate_clave_catastral(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "La clave catastral"));
        return;
    }
    if !CLAVE_CATASTRAL_RE.is_match(trimmed) {
        errors.add(ValidationError::invalid_clave_catastral(field, trimmed));
    }
}

/// Validate that the folio is a positive integer
pub fn validate_folio(folio: i64, field: &str, errors: &mut ValidationErrors) {
    if folio <= 0 {
        errors.add(
            ValidationError::new(field, format!("El folio debe ser un entero positivo: {folio}"))
                .with_suggestion("Use el número de folio asignado al predio"),
        );
    }
}

/// Validate that a monetary or area value is not negative
pub fn validate_monto(value: Decimal, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value < Decimal::ZERO {
        errors.add(ValidationError::negative_value(field, label));
    }
}

/// Validate an optional monetary value - only checked when provided
pub fn validate_monto_opcional(
    value: Option<Decimal>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if let Some(valor) = value {
        validate_monto(valor, field, label, errors);
    }
}

impl Predio {
    /// Accumulate this record's format errors under `predio[idx].` field names.
    fn validate_into(&self, idx: usize, errors: &mut ValidationErrors) {
        let campo = |nombre: &str| format!("predio[{idx}].{nombre}");

        validate_clave_catastral(&self.clave_catastral, &campo("clave_catastral"), errors);
        validate_folio(self.folio, &campo("folio"), errors);
        validate_required(&self.direccion, &campo("direccion"), "La dirección", errors);
        validate_required(
            &self.contribuyente,
            &campo("contribuyente"),
            "El contribuyente",
            errors,
        );

        validate_monto(
            self.terreno.valor_terreno_propio,
            &campo("terreno.valor_terreno_propio"),
            "El valor del terreno propio",
            errors,
        );
        validate_monto(
            self.terreno.metros_terreno_propio,
            &campo("terreno.metros_terreno_propio"),
            "La superficie del terreno propio",
            errors,
        );
        validate_monto(
            self.terreno.valor_terreno_comun,
            &campo("terreno.valor_terreno_comun"),
            "El valor del terreno común",
            errors,
        );
        validate_monto(
            self.terreno.metros_terreno_comun,
            &campo("terreno.metros_terreno_comun"),
            "La superficie del terreno común",
            errors,
        );

        validate_monto(
            self.construccion.valor_construccion_propia,
            &campo("construccion.valor_construccion_propia"),
            "El valor de la construcción propia",
            errors,
        );
        validate_monto(
            self.construccion.metros_construccion_propia,
            &campo("construccion.metros_construccion_propia"),
            "La superficie de la construcción propia",
            errors,
        );
        validate_monto(
            self.construccion.valor_construccion_comun,
            &campo("construccion.valor_construccion_comun"),
            "El valor de la construcción común",
            errors,
        );
        validate_monto(
            self.construccion.metros_construccion_comun,
            &campo("construccion.metros_construccion_comun"),
            "La superficie de la construcción común",
            errors,
        );

        validate_monto(
            self.impuesto.impuesto_predial,
            &campo("impuesto.impuesto_predial"),
            "El impuesto predial",
            errors,
        );
        validate_required(
            &self.impuesto.cantidad_con_letra,
            &campo("impuesto.cantidad_con_letra"),
            "La cantidad con letra",
            errors,
        );
        validate_monto_opcional(
            self.impuesto.recargos,
            &campo("impuesto.recargos"),
            "Los recargos",
            errors,
        );
        validate_monto_opcional(
            self.impuesto.multas,
            &campo("impuesto.multas"),
            "Las multas",
            errors,
        );
        validate_monto_opcional(
            self.impuesto.gastos_cobranza,
            &campo("impuesto.gastos_cobranza"),
            "Los gastos de cobranza",
            errors,
        );
        validate_monto_opcional(
            self.impuesto.subsidio,
            &campo("impuesto.subsidio"),
            "El subsidio",
            errors,
        );
    }
}

impl DatosRequest {
    /// Validate all input data and return a descriptive failure if invalid.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        if self.predio.is_empty() {
            return Err(ValidationFailure::Schema(
                "La lista 'predio' debe contener al menos un registro".to_string(),
            ));
        }

        let mut errors = ValidationErrors::new();
        validate_required(&self.archivo, "archivo", "El nombre del archivo", &mut errors);
        for (i, predio) in self.predio.iter().enumerate() {
            predio.validate_into(i, &mut errors);
        }

        errors.into_result().map_err(ValidationFailure::Formato)
    }
}
