use cityscout_core::{AppConfig, CategoryMap, MAX_NEARBY_RESULTS};

const DEFAULT_USER_AGENT: &str = "cityscout/0.1 (city-explorer)";

/// Settings needed to load the provider and build its HTTP client.
#[derive(Clone)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

/// Facade settings: client settings plus lookup parameters.
#[derive(Debug, Clone)]
pub struct PlacesSettings {
    pub client: ClientSettings,
    pub search_radius_m: u32,
    pub max_results: usize,
    pub photo_max_width: u32,
    pub photo_max_height: u32,
    pub categories: CategoryMap,
}

impl PlacesSettings {
    /// Settings with the documented defaults, no retries, and the given key
    /// and base URL. Intended for tests and embedding.
    #[must_use]
    pub fn with_defaults(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            client: ClientSettings {
                api_key: api_key.map(str::to_owned),
                base_url: base_url.to_owned(),
                timeout_secs: 30,
                user_agent: DEFAULT_USER_AGENT.to_owned(),
                max_retries: 0,
                retry_backoff_base_ms: 0,
            },
            search_radius_m: 30_000,
            max_results: MAX_NEARBY_RESULTS,
            photo_max_width: 400,
            photo_max_height: 300,
            categories: CategoryMap::default(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig, categories: CategoryMap) -> Self {
        Self {
            client: ClientSettings {
                api_key: config.maps_api_key.clone(),
                base_url: config.maps_base_url.clone(),
                timeout_secs: config.request_timeout_secs,
                user_agent: config.user_agent.clone(),
                max_retries: config.max_retries,
                retry_backoff_base_ms: config.retry_backoff_base_ms,
            },
            search_radius_m: config.search_radius_m,
            max_results: config.max_results.min(MAX_NEARBY_RESULTS),
            photo_max_width: config.photo_max_width,
            photo_max_height: config.photo_max_height,
            categories,
        }
    }
}
