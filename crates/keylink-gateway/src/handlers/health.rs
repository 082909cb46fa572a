use crate::model::HealthResponse;
use axum::Json;

pub const WELCOME_MESSAGE: &str = "Welcome to URL Shortener API!";

pub async fn root_handler() -> Json<&'static str> {
    Json(WELCOME_MESSAGE)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
