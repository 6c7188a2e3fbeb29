use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::sign_in_page))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/home", get(handlers::home))
        .route("/monitors", get(handlers::monitors))
        .route("/characterization", get(handlers::characterization))
        .route("/reports", get(handlers::reports))
        .route("/api/attendance/stats", get(handlers::attendance_stats))
        .route("/api/attendance/gender", get(handlers::attendance_gender))
        .route("/api/monitors/:id/summary", get(handlers::monitor_summary))
        .with_state(state)
}
