use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::application::CsvIngestUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::UserRepository;
use crate::interfaces::http::{start_server, HttpState};

/// Wire the service together and run the HTTP server until shutdown.
pub async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = AppConfig::load()?;

    let repository = Arc::new(UserRepository::connect(&config.database_url).await?);
    repository.init_schema().await?;

    let ingest_use_case = CsvIngestUseCase::new(repository.clone(), config.batch_size);
    let state = HttpState {
        ingest_use_case,
        repository,
        csv_file_path: PathBuf::from(&config.csv_file_path),
    };

    info!("Server listening on {}:{}", config.host, config.port);
    start_server(state, &config.host, config.port)?.await?;

    Ok(())
}
