//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::{ApiClient, ApiError, JamendoClient},
    config::AdminConfig,
    models::ReportQueue,
    sample_data::SampleData,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    jamendo: JamendoClient,
    sample_data: SampleData,
    reports: RwLock<ReportQueue>,
}

impl AppState {
    /// Build the state and its HTTP clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let jamendo = JamendoClient::new(&config.jamendo, config.api.timeout)?;
        let sample_data = SampleData::from_config(&config);
        let reports = RwLock::new(ReportQueue::new(sample_data.reports()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                jamendo,
                sample_data,
                reports,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// TuneNest backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn jamendo(&self) -> &JamendoClient {
        &self.inner.jamendo
    }

    /// Placeholder datasets, empty when disabled.
    #[must_use]
    pub fn sample_data(&self) -> SampleData {
        self.inner.sample_data
    }

    /// In-memory moderation queue behind the Reports view.
    #[must_use]
    pub fn reports(&self) -> &RwLock<ReportQueue> {
        &self.inner.reports
    }
}
