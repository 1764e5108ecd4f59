//! Runtime configuration and shared application state.

use std::env;
use std::path::PathBuf;

use crate::docgen::calculo::SubsidioPolicy;
use crate::docgen::catalogo::TemplateCatalog;
use crate::docgen::DocgenError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub templates_dir: PathBuf,
    pub subsidio: SubsidioPolicy,
}

impl AppConfig {
    /// Read the configuration from the environment (after `dotenvy` has run).
    ///
    /// * `PREDIAL_BIND_ADDR` - listen address, default `0.0.0.0:8080`
    /// * `PREDIAL_TEMPLATES_DIR` - template directory, default `./plantillas`
    /// * `PREDIAL_SUBSIDY_POLICY` - `cero` (default) or `porcentaje:<n>`
    pub fn from_env() -> Result<Self, String> {
        let bind_addr =
            env::var("PREDIAL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let templates_dir = PathBuf::from(
            env::var("PREDIAL_TEMPLATES_DIR").unwrap_or_else(|_| "./plantillas".to_string()),
        );
        let subsidio = match env::var("PREDIAL_SUBSIDY_POLICY") {
            Ok(raw) => SubsidioPolicy::parse(&raw)?,
            Err(_) => SubsidioPolicy::default(),
        };

        Ok(Self {
            bind_addr,
            templates_dir,
            subsidio,
        })
    }
}

/// Immutable state shared across workers; safe to clone into every request.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: TemplateCatalog,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, DocgenError> {
        let catalog = TemplateCatalog::load(&config.templates_dir)?;
        Ok(Self { config, catalog })
    }
}
