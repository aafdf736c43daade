use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::OmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ContentService, SearchService, StatsService, UserService, ViewRecorder, WatchlistService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Trackarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub omdb: Arc<OmdbClient>,

    pub search_service: Arc<SearchService>,

    pub view_recorder: Arc<ViewRecorder>,

    pub watchlist_service: Arc<WatchlistService>,

    pub content_service: Arc<ContentService>,

    pub user_service: Arc<UserService>,

    pub stats_service: Arc<StatsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        // One pooled HTTP client behind every outbound call.
        let http_client = build_shared_http_client(config.omdb.timeout_seconds)?;

        let omdb = Arc::new(OmdbClient::new(
            http_client,
            config.omdb.api_key.clone(),
            config.omdb.base_url.clone(),
            config.omdb.max_results,
        ));

        let search_service = Arc::new(SearchService::new(
            store.clone(),
            omdb.clone(),
            config.omdb.max_results,
        ));

        let view_recorder = Arc::new(ViewRecorder::new(store.clone()));
        let watchlist_service = Arc::new(WatchlistService::new(store.clone()));
        let content_service = Arc::new(ContentService::new(store.clone()));
        let user_service = Arc::new(UserService::new(store.clone()));
        let stats_service = Arc::new(StatsService::new(store.clone()));

        let config_arc = Arc::new(RwLock::new(config));

        Ok(Self {
            config: config_arc,
            store,
            omdb,
            search_service,
            view_recorder,
            watchlist_service,
            content_service,
            user_service,
            stats_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
