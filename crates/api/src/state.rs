use std::sync::Arc;

use portfolio_core::auth::{AdminCredentials, TokenKeys};
use portfolio_core::media::MediaHost;
use portfolio_core::store::DocumentStore;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaHost>,
    config: AppConfig,
    credentials: AdminCredentials,
    tokens: TokenKeys,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaHost>,
        config: AppConfig,
        credentials: AdminCredentials,
    ) -> Self {
        let tokens = TokenKeys::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::seconds(config.jwt_ttl_secs),
        );
        Self {
            inner: Arc::new(InnerState {
                store,
                media,
                config,
                credentials,
                tokens,
            }),
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    pub fn media(&self) -> &dyn MediaHost {
        self.inner.media.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn credentials(&self) -> &AdminCredentials {
        &self.inner.credentials
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.inner.tokens
    }
}
