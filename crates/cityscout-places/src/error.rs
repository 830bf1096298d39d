use thiserror::Error;

use crate::types::ProviderStatus;

/// Failure to bring the provider to the ready state.
///
/// `Clone` because one load outcome is handed to every concurrent waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("maps API key is not configured")]
    MissingCredential,

    #[error("maps API key was rejected by the provider")]
    InvalidCredential,

    #[error("invalid provider base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("provider script request failed: {0}")]
    Network(String),

    #[error("provider script request rejected with HTTP {status}")]
    Rejected { status: u16 },
}

/// Errors returned by facade lookups.
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("provider not loaded: {0}")]
    Load(#[from] LoadError),

    #[error("geocoding '{query}' failed: {status}")]
    Geocode {
        query: String,
        status: ProviderStatus,
    },

    #[error("nearby search for {category} failed: {status}")]
    Search {
        category: String,
        status: ProviderStatus,
    },

    #[error("place detail lookup for {place_id} failed: {status}")]
    Detail {
        place_id: String,
        status: ProviderStatus,
    },

    #[error("autocomplete failed: {status}")]
    Autocomplete { status: ProviderStatus },

    /// Network, TLS, or non-2xx HTTP failure. The request URL is stripped
    /// so the API key never reaches logs.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PlacesError {
    pub(crate) fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }

    /// Short name of the failing lookup, for logs and API error codes.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Geocode { .. } => "geocode",
            Self::Search { .. } => "search",
            Self::Detail { .. } => "detail",
            Self::Autocomplete { .. } => "autocomplete",
            Self::Http(_) | Self::Deserialize { .. } => "transport",
        }
    }

    /// Provider status carried by the error, if it came from a lookup response.
    #[must_use]
    pub fn provider_status(&self) -> Option<&ProviderStatus> {
        match self {
            Self::Geocode { status, .. }
            | Self::Search { status, .. }
            | Self::Detail { status, .. }
            | Self::Autocomplete { status } => Some(status),
            _ => None,
        }
    }

    /// `true` when the provider reported that nothing matched.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.provider_status(),
            Some(ProviderStatus::ZeroResults | ProviderStatus::NotFound)
        )
    }
}
