//! lostfound-api library - lost & found HTTP service
//!
//! Exposes the router and state so integration tests can drive the
//! service without binding a socket.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use lostfound_common::config::TomlConfig;
use lostfound_common::events::EventBus;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod coordinator;
pub mod detector;
pub mod error;
pub mod store;
pub mod uploads;

pub use crate::coordinator::LifecycleCoordinator;
pub use crate::error::{ApiError, ApiResult};

/// Largest accepted request body (item photos)
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Owner of item/claim state and the event bus
    pub coordinator: Arc<LifecycleCoordinator>,
    /// Directory served under `/uploads`
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(coordinator: Arc<LifecycleCoordinator>, uploads_dir: PathBuf) -> Self {
        Self {
            coordinator,
            uploads_dir,
        }
    }

    /// Wire up the event bus, detector and coordinator from configuration
    pub fn from_config(config: &TomlConfig) -> Self {
        let event_bus = EventBus::new(config.event_capacity);
        let detector = detector::from_config(&config.detector);
        let coordinator = LifecycleCoordinator::new(
            event_bus,
            detector,
            config.uploads_dir.clone(),
            config.claim_policy,
        );
        Self::new(Arc::new(coordinator), config.uploads_dir.clone())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .merge(api::item_routes())
        .merge(api::claim_routes())
        .merge(api::event_routes())
        .merge(api::health_routes())
        .nest_service(uploads::UPLOADS_ROUTE, uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
