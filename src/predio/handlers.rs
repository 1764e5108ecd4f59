use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse, Responder};
use log::{debug, error, info};
use utoipa::ToSchema;

use crate::config::AppState;
use crate::docgen::catalogo::{TemplateMode, TemplateSpec};
use crate::docgen::contexto::ContextBuilder;
use crate::docgen::plantilla::DocxRenderEngine;
use crate::docgen::DocgenError;
use crate::predio::models::DatosRequest;
use crate::predio::multipart_parser::MultipartParser;
use crate::ErrorResponse;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(ToSchema)]
pub struct GenerarDocxUpload {
    /// Archivo .json con los datos del predio
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generación de documentos",
    post,
    path = "/generar-docx",
    request_body(content = inline(GenerarDocxUpload), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Documento DOCX generado; se devuelve como adjunto"),
        (status = 400, description = "El archivo subido no es .json", body = ErrorResponse),
        (status = 422, description = "JSON inválido o datos fuera de formato", body = ErrorResponse),
        (status = 500, description = "Plantilla no encontrada o error interno", body = ErrorResponse)
    )
)]
pub async fn generar_docx(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    info!("Executing generar_docx handler");
    let (bytes, filename) = match MultipartParser::parse_json_upload(payload).await {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Invalid multipart upload: {}", e);
            return HttpResponse::from(e);
        }
    };
    debug!("Received JSON upload '{}' ({} bytes)", filename, bytes.len());
    procesar(&data, &bytes)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generación de documentos",
    post,
    path = "/generar-docx/json",
    request_body = DatosRequest,
    responses(
        (status = 200, description = "Documento DOCX generado; se devuelve como adjunto"),
        (status = 422, description = "JSON inválido o datos fuera de formato", body = ErrorResponse),
        (status = 500, description = "Plantilla no encontrada o error interno", body = ErrorResponse)
    )
)]
pub async fn generar_docx_json(body: web::Bytes, data: web::Data<AppState>) -> impl Responder {
    info!("Executing generar_docx_json handler");
    procesar(&data, &body)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generación de documentos",
    get,
    path = "/plantillas",
    responses(
        (status = 200, description = "Plantillas registradas en el catálogo", body = [TemplateSpec])
    )
)]
pub async fn listar_plantillas(data: web::Data<AppState>) -> impl Responder {
    let plantillas: Vec<TemplateSpec> = data.catalog.templates().into_iter().cloned().collect();
    HttpResponse::Ok().json(plantillas)
}

/// Shared pipeline: decode, validate, build the context, render, respond.
fn procesar(data: &AppState, raw: &[u8]) -> HttpResponse {
    let datos: DatosRequest = match serde_json::from_slice(raw) {
        Ok(datos) => datos,
        Err(e) => {
            error!("Malformed JSON payload: {}", e);
            return HttpResponse::UnprocessableEntity()
                .json(ErrorResponse::new("SchemaError", &format!("JSON inválido: {e}")));
        }
    };

    if let Err(fallo) = datos.validate() {
        error!("Validation failed: {}", fallo);
        return HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::new(fallo.kind(), &fallo.to_string()));
    }

    let spec = match data.catalog.resolve(datos.plantilla.as_deref()) {
        Ok(spec) => spec,
        Err(e) => {
            error!("Template resolution failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let builder = ContextBuilder::new(data.config.subsidio, spec.convencion);
    let contexto = match spec.modo {
        TemplateMode::SingleRecord => builder.single(&datos.predio[0]),
        TemplateMode::MultiRecord => builder.merged(&datos.predio),
    };
    debug!(
        "Built substitution context with {} keys for template '{}'",
        contexto.len(),
        spec.nombre
    );

    match DocxRenderEngine::render(
        &data.catalog.path_for(spec),
        spec.estilo,
        &contexto,
        &datos.archivo,
    ) {
        Ok(doc) => {
            info!("Generated document '{}' ({} bytes)", doc.filename, doc.docx.len());
            HttpResponse::Ok()
                .content_type(DOCX_MIME)
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", doc.filename),
                ))
                .body(doc.docx)
        }
        Err(e @ (DocgenError::TemplateNotFound(_) | DocgenError::UnknownTemplate(_))) => {
            error!("Template not found: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
        Err(e) => {
            error!("Document rendering failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&format!("Error interno: {e}")))
        }
    }
}

/// Register the document-generation routes under the `/api` scope.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generar-docx").route(web::post().to(generar_docx)))
        .service(web::resource("/generar-docx/json").route(web::post().to(generar_docx_json)))
        .service(web::resource("/plantillas").route(web::get().to(listar_plantillas)));
}
