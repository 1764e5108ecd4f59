use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::StreamExt;

use crate::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("Solo se aceptan archivos .json, se recibió: {0}")]
    UploadType(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("El multipart no contiene ningún archivo")]
    MissingFile,
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::UploadType(_)
            | MultipartParseError::MissingFile
            | MultipartParseError::FieldError(_) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!("{}", error)))
            }
            _ => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&format!("{}", error))),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Extract the uploaded `.json` file from a multipart payload.
    ///
    /// Returns the raw bytes and the original filename. Fields without a
    /// filename are skipped; a file with any other extension is rejected.
    pub async fn parse_json_upload(
        mut multipart: Multipart,
    ) -> Result<(Vec<u8>, String), MultipartParseError> {
        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;

            let maybe_filename = {
                let content_disposition = field.content_disposition().ok_or_else(|| {
                    MultipartParseError::FieldError("Content disposition not found".to_string())
                })?;
                content_disposition.get_filename().map(|s| s.to_string())
            };

            let Some(filename) = maybe_filename else {
                continue;
            };

            if !filename.to_ascii_lowercase().ends_with(".json") {
                return Err(MultipartParseError::UploadType(filename));
            }

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                buffer.extend_from_slice(&data);
            }

            return Ok((buffer, filename));
        }

        Err(MultipartParseError::MissingFile)
    }
}
