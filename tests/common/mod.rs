use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use nourrise::application::{advisor::Advisor, day_service::DayServiceImpl, task_service::TaskServiceImpl};
use nourrise::http::routing::{self, history, tasks};
use nourrise::infrastructure::sqlite_repo::SqliteStore;

pub async fn app() -> Router {
    // use in-memory sqlite for tests
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.init_all().await.unwrap();
    let task_service = TaskServiceImpl::new(store.clone());
    let day_service = DayServiceImpl::new(store.clone(), store, Arc::new(Advisor::new(Some(7))));
    routing::app(
        tasks::router(tasks::AppState { service: task_service })
            .merge(history::router(history::AppState { service: day_service })),
    )
}

pub async fn request(app: &Router, method: &str, path: &str, body: Option<serde_json::Value>) -> hyper::Response<Body> {
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let req = Request::builder().method(Method::from_bytes(method.as_bytes()).unwrap()).uri(path);
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

pub async fn json(res: hyper::Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&to_bytes(res.into_body(), 1024 * 1024).await.unwrap()).unwrap()
}
