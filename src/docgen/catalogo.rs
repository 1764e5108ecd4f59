//! Template catalog.
//!
//! Declares, per template, the on-disk file, the render mode (single-record
//! vs multi-record) and the placeholder convention. The mapping lives here
//! instead of inside the request so a multi-property request against a
//! single-record template is an explicit catalog decision, never a silent
//! truncation chosen by the handler.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::docgen::contexto::KeyConvention;
use crate::docgen::placeholder::PlaceholderStyle;
use crate::docgen::DocgenError;

/// Template registered when the directory has no manifest and a request
/// names none (the historical fixed template of the tax office).
pub const PLANTILLA_PREDETERMINADA: &str = "1785-003";

const MANIFIESTO: &str = "catalogo.json";

/// How many records a template consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateMode {
    /// The context is one flattened predio (the first of the request).
    #[default]
    SingleRecord,
    /// The context carries every predio under indexed roots.
    MultiRecord,
}

/// Catalog entry for one template.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateSpec {
    pub nombre: String,
    /// Filename inside the templates directory; defaults to `<nombre>.docx`.
    #[serde(default)]
    pub archivo: String,
    #[serde(default)]
    pub modo: TemplateMode,
    #[serde(default)]
    pub estilo: PlaceholderStyle,
    #[serde(default)]
    pub convencion: KeyConvention,
}

/// In-memory catalog loaded at startup from the templates directory.
pub struct TemplateCatalog {
    dir: PathBuf,
    entries: HashMap<String, TemplateSpec>,
}

impl TemplateCatalog {
    /// Load the catalog: parse `catalogo.json` when present, otherwise
    /// register every `.docx` in the directory with default mode and style.
    pub fn load(dir: &Path) -> Result<Self, DocgenError> {
        if !dir.is_dir() {
            return Err(DocgenError::TemplatesDirMissing(dir.display().to_string()));
        }

        let mut entries = HashMap::new();
        let manifiesto = dir.join(MANIFIESTO);
        if manifiesto.is_file() {
            let raw = fs::read_to_string(&manifiesto).map_err(DocgenError::TemplateIo)?;
            let specs: Vec<TemplateSpec> = serde_json::from_str(&raw)
                .map_err(|e| DocgenError::ManifestInvalid(e.to_string()))?;
            for mut spec in specs {
                if spec.archivo.is_empty() {
                    spec.archivo = format!("{}.docx", spec.nombre);
                }
                entries.insert(spec.nombre.clone(), spec);
            }
        } else {
            for entry in fs::read_dir(dir).map_err(DocgenError::TemplateIo)? {
                let path = entry.map_err(DocgenError::TemplateIo)?.path();
                let es_docx = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("docx"))
                    .unwrap_or(false);
                if !es_docx {
                    continue;
                }
                let Some(nombre) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                entries.insert(
                    nombre.to_string(),
                    TemplateSpec {
                        nombre: nombre.to_string(),
                        archivo: format!("{nombre}.docx"),
                        modo: TemplateMode::default(),
                        estilo: PlaceholderStyle::default(),
                        convencion: KeyConvention::default(),
                    },
                );
            }
        }

        if entries.is_empty() {
            log::warn!(
                "Template catalog at {} is empty; every request will fail with 500",
                dir.display()
            );
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    /// Resolve a requested template name, falling back to the default entry
    /// (or the first registered one) when the request names none.
    pub fn resolve(&self, nombre: Option<&str>) -> Result<&TemplateSpec, DocgenError> {
        match nombre {
            Some(n) => self
                .entries
                .get(n)
                .ok_or_else(|| DocgenError::UnknownTemplate(n.to_string())),
            None => {
                if let Some(spec) = self.entries.get(PLANTILLA_PREDETERMINADA) {
                    return Ok(spec);
                }
                let mut nombres: Vec<&String> = self.entries.keys().collect();
                nombres.sort();
                nombres
                    .first()
                    .and_then(|n| self.entries.get(*n))
                    .ok_or_else(|| {
                        DocgenError::UnknownTemplate(PLANTILLA_PREDETERMINADA.to_string())
                    })
            }
        }
    }

    pub fn path_for(&self, spec: &TemplateSpec) -> PathBuf {
        self.dir.join(&spec.archivo)
    }

    /// All registered templates, sorted by name.
    pub fn templates(&self) -> Vec<&TemplateSpec> {
        let mut specs: Vec<&TemplateSpec> = self.entries.values().collect();
        specs.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        specs
    }
}
