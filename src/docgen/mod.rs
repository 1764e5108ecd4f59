//! Docgen module - business logic for producing DOCX documents from templates.
//!
//! The pipeline is pure until the render step: a validated predio goes through
//! the derived-value calculator, the context builder flattens it into a
//! placeholder mapping, and the render engine substitutes that mapping into
//! the template archive.

pub mod calculo;
pub mod catalogo;
pub mod common;
pub mod contexto;
pub mod placeholder;
pub mod plantilla;

pub use calculo::{Liquidacion, SubsidioPolicy};
pub use catalogo::{TemplateCatalog, TemplateMode, TemplateSpec};
pub use contexto::{ContextBuilder, ContextoSustitucion, KeyConvention};
pub use placeholder::PlaceholderStyle;
pub use plantilla::DocxRenderEngine;

use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum DocgenError {
    #[error("el directorio de plantillas no existe: {0}")]
    TemplatesDirMissing(String),
    #[error("el manifiesto del catálogo no es válido: {0}")]
    ManifestInvalid(String),
    #[error("la plantilla '{0}' no está registrada en el catálogo")]
    UnknownTemplate(String),
    #[error("plantilla no encontrada: {0}")]
    TemplateNotFound(String),
    #[error("no se pudo leer la plantilla: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("la plantilla no es un archivo DOCX válido: {0}")]
    TemplateArchive(#[source] zip::result::ZipError),
    #[error("la parte '{0}' de la plantilla no es texto UTF-8")]
    PartEncoding(String),
    #[error("no se pudo ensamblar el documento generado: {0}")]
    WriteDocument(#[source] zip::result::ZipError),
    #[error("error de E/S al generar el documento: {0}")]
    StageIo(#[source] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub docx: Vec<u8>,
}
