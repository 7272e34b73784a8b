use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{error, instrument};

use crate::error::Result;
use crate::models::statistics::{DailyStats, GlobalStats, MonthlyStats};
use crate::services::api_client::ApiClient;

const STATS_PATH: &str = "candidatures/stats";

/// Aggregated figures. Every call is bounded by the statistics timeout.
#[derive(Clone)]
pub struct StatisticsService {
    api: ApiClient,
    timeout: Duration,
}

impl StatisticsService {
    pub fn new(api: ApiClient, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let path = format!("{}/{}", STATS_PATH, endpoint);
        self.api
            .get_json_with_timeout(&path, self.timeout)
            .await
            .map_err(|e| {
                error!(endpoint, error = %e, "Failed to load statistics");
                e
            })
    }

    #[instrument(skip(self))]
    pub async fn global(&self) -> Result<GlobalStats> {
        self.fetch("globales").await
    }

    #[instrument(skip(self))]
    pub async fn monthly(&self) -> Result<Vec<MonthlyStats>> {
        self.fetch("par-mois").await
    }

    /// Per-day figures with that day's candidatures, oldest first.
    #[instrument(skip(self))]
    pub async fn daily(&self) -> Result<Vec<DailyStats>> {
        let mut days: Vec<DailyStats> = self.fetch("par-jour").await?;
        days.sort_by_key(|d| d.day);
        Ok(days)
    }
}
