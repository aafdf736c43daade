use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::API_PREFIX;
use crate::state::SharedState;

mod content;
mod error;
mod history;
mod observability;
mod search;
mod system;
mod types;
mod users;
mod validation;
mod watchlist;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<crate::services::SearchService> {
        &self.shared.search_service
    }

    #[must_use]
    pub fn view_recorder(&self) -> &Arc<crate::services::ViewRecorder> {
        &self.shared.view_recorder
    }

    #[must_use]
    pub fn watchlist_service(&self) -> &Arc<crate::services::WatchlistService> {
        &self.shared.watchlist_service
    }

    #[must_use]
    pub fn content_service(&self) -> &Arc<crate::services::ContentService> {
        &self.shared.content_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<crate::services::UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn stats_service(&self) -> &Arc<crate::services::StatsService> {
        &self.shared.stats_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let v1_router = Router::new()
        .route("/content", post(content::create))
        .route("/content/{content_id}", get(content::get_by_id))
        .route("/content/imdb/{imdb_id}", get(content::get_by_imdb_id))
        .route("/users", post(users::create))
        .route("/users/account/{account_id}", get(users::get_by_account_id))
        .route("/history", post(history::record_view))
        .route("/history/user/{user_id}", get(history::get_user_history))
        .route(
            "/history/user/{user_id}/stats",
            get(history::get_user_stats),
        )
        .route("/watchlist", post(watchlist::add_entry))
        .route(
            "/watchlist/user/{user_id}",
            get(watchlist::get_user_watchlist),
        )
        .route(
            "/watchlist/user/{user_id}",
            delete(watchlist::clear_user_watchlist),
        )
        .route("/watchlist/{entry_id}", delete(watchlist::remove_entry))
        .route("/search", get(search::search_content));

    let system_router = Router::new()
        .route("/health", get(system::get_health))
        .route("/system/overview", get(system::get_overview));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest(API_PREFIX, v1_router)
        .nest("/api", system_router)
        .route("/metrics", get(observability::get_metrics))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
}
