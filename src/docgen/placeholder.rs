//! Pluggable placeholder syntaxes.
//!
//! Each template declares the syntax its placeholders use; the substitution
//! itself is shared. Unknown placeholders are left verbatim so a template
//! problem is visible in the generated document instead of silently erased.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::docgen::contexto::ContextoSustitucion;

lazy_static! {
    static ref RE_DOBLE_LLAVE: Regex =
        Regex::new(r"\{\{\s*([A-Za-z0-9_][A-Za-z0-9_.]*)\s*\}\}").unwrap();
    static ref RE_LLAVE_SIMPLE: Regex =
        Regex::new(r"\{\s*([A-Za-z0-9_][A-Za-z0-9_.]*)\s*\}").unwrap();
    static ref RE_SHELL: Regex = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_.]*)").unwrap();
}

/// Placeholder syntax used by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderStyle {
    /// `{{KEY}}` or `{{ p.seccion.campo }}`.
    #[default]
    FlatBrace,
    /// `{KEY}`.
    SingleBrace,
    /// `$KEY`.
    ShellStyle,
}

impl PlaceholderStyle {
    fn regex(&self) -> &'static Regex {
        match self {
            PlaceholderStyle::FlatBrace => &RE_DOBLE_LLAVE,
            PlaceholderStyle::SingleBrace => &RE_LLAVE_SIMPLE,
            PlaceholderStyle::ShellStyle => &RE_SHELL,
        }
    }
}

/// Replace every placeholder of the given style found in `texto` with its
/// value from the context. Placeholders without a context entry stay as-is.
pub fn sustituir(texto: &str, estilo: PlaceholderStyle, ctx: &ContextoSustitucion) -> String {
    estilo
        .regex()
        .replace_all(texto, |caps: &Captures| match ctx.get(&caps[1]) {
            Some(valor) => valor.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
