use crate::models::HealthResponse;
use rocket::get;
use rocket::serde::json::Json;

#[get("/")]
pub fn index() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Movie Aggregator Service is running!".to_string(),
    })
}

#[get("/health")]
pub fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Service is operational".to_string(),
    })
}
