use std::io::{Read, Write};

use actix_web::{http::header, http::StatusCode, test, web, App};
use serde_json::json;

use predial_server::config::{AppConfig, AppState};
use predial_server::docgen::calculo::SubsidioPolicy;
use predial_server::predio::handlers;
use predial_server::ErrorResponse;

fn docx_bytes(document_xml: &str) -> Vec<u8> {
    let mut writer = zip::write::ZipWriter::new(std::io::Cursor::new(Vec::new()));

    writer
        .start_file::<_, ()>("[Content_Types].xml", zip::write::FileOptions::default())
        .unwrap();
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types/>"#)
        .unwrap();
    writer
        .start_file::<_, ()>("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();

    writer.finish().unwrap().into_inner()
}

/// Templates directory with a manifest: the default single-record template,
/// a multi-record listing and an entry whose file is missing on disk.
fn setup_state() -> (tempfile::TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(
        dir.path().join("1785-003.docx"),
        docx_bytes(
            "<w:document><w:body><w:p><w:t>Clave {{ p.clave_catastral }} debe \
             {{ p.liquidacion.total_a_pagar }} a nombre de {{ p.contribuyente }}\
             </w:t></w:p></w:body></w:document>",
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("listado.docx"),
        docx_bytes(
            "<w:document><w:body><w:p><w:t>{{ predios.total }} predios: \
             {{ p1.clave_catastral }} y {{ p2.clave_catastral }}\
             </w:t></w:p></w:body></w:document>",
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("catalogo.json"),
        r#"[
            {"nombre": "1785-003"},
            {"nombre": "listado", "modo": "multi-record"},
            {"nombre": "fantasma", "archivo": "no-existe.docx"}
        ]"#,
    )
    .unwrap();

    let config = AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        templates_dir: dir.path().to_path_buf(),
        subsidio: SubsidioPolicy::Cero,
    };
    let state = AppState::new(config).unwrap();
    (dir, web::Data::new(state))
}

fn datos_ejemplo() -> serde_json::Value {
    json!({
        "archivo": "recibo-predial",
        "predio": [predio_ejemplo("123-45-678-90-12-AB1")]
    })
}

fn predio_ejemplo(clave: &str) -> serde_json::Value {
    json!({
        "clave_catastral": clave,
        "folio": 1785,
        "direccion": "Av. Juárez 100",
        "contribuyente": "María López",
        "terreno": {
            "valor_terreno_propio": 250000.0,
            "metros_terreno_propio": 120.5,
            "valor_terreno_comun": 50000.0,
            "metros_terreno_comun": 30.5
        },
        "construccion": {
            "valor_construccion_propia": 400000.0,
            "metros_construccion_propia": 90.0,
            "valor_construccion_comun": 0.0,
            "metros_construccion_comun": 0.0
        },
        "impuesto": {
            "impuesto_predial": 10000.0,
            "cantidad_con_letra": "Diez mil pesos 00/100 M.N."
        }
    })
}

fn multipart_body(json: &str, filename: &str) -> (String, String) {
    let boundary = "X-PREDIAL-TEST-BOUNDARY".to_string();
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/json\r\n\r\n{json}\r\n--{b}--\r\n",
        b = boundary
    );
    (body, boundary)
}

fn leer_document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(docx.to_vec())).unwrap();
    let mut texto = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut texto)
        .unwrap();
    texto
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(handlers::config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_generar_docx_json_ok() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(datos_ejemplo())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(disposition, "attachment; filename=recibo-predial.docx");

    let body = test::read_body(resp).await;
    let texto = leer_document_xml(&body);
    assert!(texto.contains("123-45-678-90-12-AB1"));
    assert!(texto.contains("10,300.00"));
    assert!(texto.contains("María López"));
    assert!(!texto.contains("{{"));
}

#[actix_web::test]
async fn test_generar_docx_upload_ok() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let (body, boundary) = multipart_body(&datos_ejemplo().to_string(), "datos.json");
    let req = test::TestRequest::post()
        .uri("/api/generar-docx")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_upload_extension_invalida() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let (body, boundary) = multipart_body(&datos_ejemplo().to_string(), "datos.txt");
    let req = test::TestRequest::post()
        .uri("/api/generar-docx")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "BadRequest");
}

#[actix_web::test]
async fn test_json_malformado() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ malformed json ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "SchemaError");
}

#[actix_web::test]
async fn test_lista_de_predios_vacia() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(json!({"archivo": "recibo", "predio": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "SchemaError");
}

#[actix_web::test]
async fn test_clave_catastral_invalida() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(json!({
            "archivo": "recibo",
            "predio": [predio_ejemplo("123-45-678-90-12")]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "FormatError");
}

#[actix_web::test]
async fn test_plantilla_desconocida() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let mut datos = datos_ejemplo();
    datos["plantilla"] = json!("no-registrada");
    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(datos)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_plantilla_sin_archivo_en_disco() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let mut datos = datos_ejemplo();
    datos["plantilla"] = json!("fantasma");
    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(datos)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "InternalServerError");
    assert!(error.message.contains("no-existe.docx"));
}

#[actix_web::test]
async fn test_plantilla_multi_record() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let datos = json!({
        "archivo": "listado-predial",
        "plantilla": "listado",
        "predio": [
            predio_ejemplo("123-45-678-90-12-AB1"),
            predio_ejemplo("321-54-876-09-21-CD2")
        ]
    });
    let req = test::TestRequest::post()
        .uri("/api/generar-docx/json")
        .set_json(datos)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let texto = leer_document_xml(&body);
    assert!(texto.contains("2 predios"));
    assert!(texto.contains("123-45-678-90-12-AB1"));
    assert!(texto.contains("321-54-876-09-21-CD2"));
}

#[actix_web::test]
async fn test_listar_plantillas() {
    let (_dir, state) = setup_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/plantillas").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let plantillas: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(plantillas.len(), 3);
    assert_eq!(plantillas[0]["nombre"], "1785-003");
    assert_eq!(plantillas[1]["nombre"], "fantasma");
    assert_eq!(plantillas[2]["modo"], "multi-record");
}
