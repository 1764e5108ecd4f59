use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use chrono;
use dotenvy;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod docgen;
pub mod predio;

pub use crate::config::{AppConfig, AppState};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::predio::handlers::generar_docx,
            crate::predio::handlers::generar_docx_json,
            crate::predio::handlers::listar_plantillas,
        ),
        components(
            schemas(
                predio::models::DatosRequest,
                predio::models::Predio,
                predio::models::Terreno,
                predio::models::Construccion,
                predio::models::Impuesto,
                predio::handlers::GenerarDocxUpload,
                docgen::catalogo::TemplateSpec,
                docgen::catalogo::TemplateMode,
                docgen::placeholder::PlaceholderStyle,
                docgen::contexto::KeyConvention,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Generación de documentos", description = "Generación de documentos DOCX de predios.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!(
                "Invalid configuration. Please check your PREDIAL_* variables in .env. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };
    let bind_addr = app_config.bind_addr.clone();
    let app_state = match AppState::new(app_config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to load the template catalog. Please check PREDIAL_TEMPLATES_DIR and ensure the directory exists. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("predial_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(predio::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind_addr)?
    .run()
    .await
}
