pub mod chart;
pub mod config;
pub mod dto;
pub mod error;
pub mod forms;
pub mod models;
pub mod notifications;
pub mod preferences;
pub mod registry;
pub mod services;
pub mod session;
pub mod storage;
pub mod theme;
pub mod utils;
pub mod view;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::notifications::Notifications;
use crate::preferences::ColumnPreferenceStore;
use crate::services::{
    api_client::ApiClient,
    auth_service::AuthService,
    candidature_service::{CandidatureService, CandidatureStore},
    statistics_service::StatisticsService,
    user_data_service::UserDataService,
};
use crate::session::SessionStore;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::theme::ThemeStore;
use crate::view::ListView;

/// Everything a front end needs, wired once from a [`Config`].
#[derive(Clone)]
pub struct ClientState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub session: SessionStore,
    pub notifications: Notifications,
    pub api: ApiClient,
    pub auth: AuthService,
    pub candidatures: CandidatureService,
    pub statistics: StatisticsService,
    pub user_data: UserDataService,
    pub column_preferences: ColumnPreferenceStore,
}

impl ClientState {
    /// Persists to `config.storage_path` when set, in memory otherwise.
    pub fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Result<Self> {
        config.validate()?;
        let session = SessionStore::load(storage.clone());
        let notifications = Notifications::new();
        let api = ApiClient::new(&config, session.clone(), notifications.clone())?;

        let state = Self {
            auth: AuthService::new(api.clone()),
            candidatures: CandidatureService::new(api.clone(), CandidatureStore::new()),
            statistics: StatisticsService::new(api.clone(), config.stats_timeout),
            user_data: UserDataService::new(api.clone()),
            column_preferences: ColumnPreferenceStore::new(storage.clone()),
            config,
            storage,
            session,
            notifications,
            api,
        };
        info!(
            base_url = %state.api.base_url(),
            authenticated = state.session.is_authenticated(),
            "Client initialized"
        );
        Ok(state)
    }

    /// List screen backed by the shared candidature store, with saved
    /// column preferences applied. Service writes show up on the next read.
    pub fn list_view(&self) -> ListView {
        ListView::over(self.candidatures.store().clone())
            .with_preferences(self.column_preferences.clone())
            .with_notifications(self.notifications.clone())
    }

    pub fn theme_store(&self, system_prefers_dark: bool) -> ThemeStore {
        ThemeStore::load(self.storage.clone(), system_prefers_dark)
    }
}
