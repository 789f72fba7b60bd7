use tracing::error;

#[actix_web::main]
async fn main() {
    if let Err(err) = demograph::app::run().await {
        error!("Fatal: {}", err);
        std::process::exit(1);
    }
}
