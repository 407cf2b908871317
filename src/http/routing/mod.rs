use axum::{routing::get, Router};

pub use super::routes::{history, tasks};

pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
}
