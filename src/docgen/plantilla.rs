//! DOCX render engine.
//!
//! A `.docx` template is a ZIP archive; rendering substitutes placeholders
//! in the text parts (`word/document.xml`, headers, footers, notes) and
//! copies every other entry through untouched. Substituted values are
//! XML-escaped before insertion. Everything is staged in memory, so there
//! is nothing to clean up on error paths.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use sanitize_filename::sanitize;
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

use crate::docgen::common::escape_xml;
use crate::docgen::contexto::ContextoSustitucion;
use crate::docgen::placeholder::{sustituir, PlaceholderStyle};
use crate::docgen::{DocgenError, GeneratedDocument};

/// Stateless engine for rendering DOCX templates.
pub struct DocxRenderEngine;

impl DocxRenderEngine {
    /// Render a template file with the given context.
    ///
    /// # Arguments
    /// * `template_path` - Location of the `.docx` template on disk.
    /// * `estilo` - Placeholder syntax declared by the catalog for this template.
    /// * `ctx` - Substitution context (values are escaped here, not by the caller).
    /// * `output_name_base` - Requested output name, sanitized into the final filename.
    pub fn render(
        template_path: &Path,
        estilo: PlaceholderStyle,
        ctx: &ContextoSustitucion,
        output_name_base: &str,
    ) -> Result<GeneratedDocument, DocgenError> {
        if !template_path.is_file() {
            return Err(DocgenError::TemplateNotFound(
                template_path.display().to_string(),
            ));
        }
        let file = File::open(template_path).map_err(DocgenError::TemplateIo)?;
        let docx = Self::render_archive(file, estilo, ctx)?;

        Ok(GeneratedDocument {
            filename: attachment_filename(output_name_base),
            docx,
        })
    }

    /// Render an already-open template archive into a new archive in memory.
    pub fn render_archive<R: Read + Seek>(
        reader: R,
        estilo: PlaceholderStyle,
        ctx: &ContextoSustitucion,
    ) -> Result<Vec<u8>, DocgenError> {
        let mut archive = ZipArchive::new(reader).map_err(DocgenError::TemplateArchive)?;

        let escaped: ContextoSustitucion = ctx
            .iter()
            .map(|(clave, valor)| (clave.clone(), escape_xml(valor)))
            .collect();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(DocgenError::TemplateArchive)?;
            let name = entry.name().to_string();

            if entry.is_dir() {
                writer
                    .add_directory::<_, ()>(name, FileOptions::default())
                    .map_err(DocgenError::WriteDocument)?;
                continue;
            }

            let mut raw = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut raw).map_err(DocgenError::StageIo)?;

            let data = if is_text_part(&name) {
                let texto = String::from_utf8(raw)
                    .map_err(|_| DocgenError::PartEncoding(name.clone()))?;
                sustituir(&texto, estilo, &escaped).into_bytes()
            } else {
                raw
            };

            writer
                .start_file::<_, ()>(name, FileOptions::default())
                .map_err(DocgenError::WriteDocument)?;
            writer.write_all(&data).map_err(DocgenError::StageIo)?;
        }

        let cursor = writer.finish().map_err(DocgenError::WriteDocument)?;
        Ok(cursor.into_inner())
    }
}

/// Parts of the archive subject to placeholder substitution.
fn is_text_part(name: &str) -> bool {
    name == "word/document.xml"
        || name == "word/footnotes.xml"
        || name == "word/endnotes.xml"
        || (name.starts_with("word/header") && name.ends_with(".xml"))
        || (name.starts_with("word/footer") && name.ends_with(".xml"))
}

/// Build the `Content-Disposition` filename from the requested output name.
pub fn attachment_filename(base: &str) -> String {
    let base = base.trim().trim_end_matches(".docx");
    let seguro = sanitize(base);
    if seguro.is_empty() {
        "documento.docx".to_string()
    } else {
        format!("{seguro}.docx")
    }
}
