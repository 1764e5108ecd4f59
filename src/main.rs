#[actix_web::main]
async fn main() -> std::io::Result<()> {
    predial_server::run().await
}
