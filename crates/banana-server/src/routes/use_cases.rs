use axum::{routing::get, Json, Router};
use banana::use_case::{UseCase, UseCaseInfo};

async fn list_use_cases() -> Json<Vec<UseCaseInfo>> {
    Json(UseCase::catalog())
}

pub fn routes() -> Router {
    Router::new().route("/api/use-cases", get(list_use_cases))
}
