use crate::application::CsvIngestUseCase;
use crate::domain::distribution::AgeDistribution;
use crate::infrastructure::db::{UserRepository, UserStore};
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub struct HttpState {
    pub ingest_use_case: CsvIngestUseCase<UserRepository>,
    pub repository: Arc<UserRepository>,
    pub csv_file_path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
    pub message: String,
    #[serde(rename = "ageDistribution")]
    pub age_distribution: AgeDistribution,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Trigger ingestion of the configured CSV file and return the resulting
/// age distribution.
#[post("/load")]
async fn load_csv(data: web::Data<HttpState>) -> impl Responder {
    info!("Loading CSV from {}", data.csv_file_path.display());

    match data.ingest_use_case.execute(&data.csv_file_path).await {
        Ok(distribution) => HttpResponse::Ok().json(LoadResponse {
            message: "CSV processed and users inserted successfully.".to_string(),
            age_distribution: distribution,
        }),
        Err(e) => {
            error!("Failed to process CSV: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Report the age distribution of whatever is currently persisted.
#[get("/age-distribution")]
async fn age_distribution(data: web::Data<HttpState>) -> impl Responder {
    match data.repository.age_distribution().await {
        Ok(distribution) => HttpResponse::Ok().json(distribution),
        Err(e) => {
            error!("Failed to retrieve age distribution: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("demograph API is running.")
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(index)
            .service(
                web::scope("/api")
                    .service(load_csv)
                    .service(age_distribution),
            )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_response_wire_shape() {
        let response = LoadResponse {
            message: "CSV processed and users inserted successfully.".to_string(),
            age_distribution: AgeDistribution::from_counts(2, 3, 2, 3, 10),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value["ageDistribution"],
            serde_json::json!({"<20": 20.0, "20-40": 30.0, "40-60": 20.0, ">60": 30.0})
        );
        assert!(value["message"].is_string());
    }
}
