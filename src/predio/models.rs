//! Wire-format models for the document-generation request.
//!
//! Field names match the deployed JSON format of the tax office, so an
//! existing front end keeps working without changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Valores declarados del terreno.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Terreno {
    #[schema(value_type = f64)]
    pub valor_terreno_propio: Decimal,
    #[schema(value_type = f64)]
    pub metros_terreno_propio: Decimal,
    #[schema(value_type = f64)]
    pub valor_terreno_comun: Decimal,
    #[schema(value_type = f64)]
    pub metros_terreno_comun: Decimal,
}

/// Valores declarados de la construcción.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Construccion {
    #[schema(value_type = f64)]
    pub valor_construccion_propia: Decimal,
    #[schema(value_type = f64)]
    pub metros_construccion_propia: Decimal,
    #[schema(value_type = f64)]
    pub valor_construccion_comun: Decimal,
    #[schema(value_type = f64)]
    pub metros_construccion_comun: Decimal,
}

/// Impuesto declarado del predio. Los montos opcionales sustituyen a los
/// calculados por defecto cuando vienen con un valor mayor que cero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Impuesto {
    #[schema(value_type = f64)]
    pub impuesto_predial: Decimal,
    pub cantidad_con_letra: String,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub recargos: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub multas: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub gastos_cobranza: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub subsidio: Option<Decimal>,
    #[serde(default)]
    pub ultimo_periodo_pagado: Option<String>,
}

/// Un registro catastral completo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Predio {
    pub clave_catastral: String,
    pub folio: i64,
    pub direccion: String,
    pub contribuyente: String,
    pub terreno: Terreno,
    pub construccion: Construccion,
    pub impuesto: Impuesto,
}

/// Cuerpo de la petición de generación de documento.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatosRequest {
    /// Nombre del archivo de salida (sin extensión).
    pub archivo: String,
    /// Plantilla del catálogo a usar; si falta se usa la predeterminada.
    #[serde(default)]
    pub plantilla: Option<String>,
    pub predio: Vec<Predio>,
}
