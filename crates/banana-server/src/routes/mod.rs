// Export route modules
pub mod chatbot;
pub mod use_cases;

use crate::state::AppState;
use axum::{routing::get, Router};

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .route("/status", get(|| async { "ok" }))
        .merge(chatbot::routes(state))
        .merge(use_cases::routes())
}
