use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/calendar", get(handlers::calendar_page))
        .route("/pushups/add", post(handlers::add_pushups))
        .route("/pushups/increment", post(handlers::increment))
        .route("/pushups/reset", post(handlers::reset))
        .route("/goal", post(handlers::update_goal))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/pushups", post(handlers::post_pushups))
        .route("/api/goal", post(handlers::post_goal))
        .with_state(state)
}
