use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::candidature_dto::{CandidaturePayload, StatusUpdatePayload};
use crate::error::Result;
use crate::models::candidature::Candidature;
use crate::models::enums::ApplicationStatus;
use crate::services::api_client::ApiClient;

const COLLECTION: &str = "candidatures";

#[derive(Debug, Default)]
struct StoreState {
    candidatures: Vec<Candidature>,
    loading: bool,
    error: Option<String>,
    version: u64,
}

impl StoreState {
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Locally held collection, patched in place after each successful write.
///
/// Clones share the same records. Every change to the records bumps
/// [`CandidatureStore::version`] so derived views know when to recompute.
#[derive(Clone, Default)]
pub struct CandidatureStore {
    inner: Arc<RwLock<StoreState>>,
}

impl CandidatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn version(&self) -> u64 {
        self.read(|s| s.version)
    }

    pub fn all(&self) -> Vec<Candidature> {
        self.read(|s| s.candidatures.clone())
    }

    pub fn get(&self, id: i64) -> Option<Candidature> {
        self.read(|s| s.candidatures.iter().find(|c| c.id == id).cloned())
    }

    pub fn total(&self) -> usize {
        self.read(|s| s.candidatures.len())
    }

    /// Non-archived records.
    pub fn active(&self) -> Vec<Candidature> {
        self.read(|s| s.candidatures.iter().filter(|c| !c.archived).cloned().collect())
    }

    pub fn total_active(&self) -> usize {
        self.read(|s| s.candidatures.iter().filter(|c| !c.archived).count())
    }

    pub fn by_status(&self) -> BTreeMap<ApplicationStatus, Vec<Candidature>> {
        self.read(|s| {
            let mut grouped: BTreeMap<ApplicationStatus, Vec<Candidature>> = BTreeMap::new();
            for c in &s.candidatures {
                grouped.entry(c.status).or_default().push(c.clone());
            }
            grouped
        })
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn set_all(&self, candidatures: Vec<Candidature>) {
        self.write(|s| {
            if s.candidatures != candidatures {
                s.candidatures = candidatures;
                s.bump();
            }
        });
    }

    pub fn push(&self, candidature: Candidature) {
        self.write(|s| {
            s.candidatures.push(candidature);
            s.bump();
        });
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert(&self, candidature: Candidature) {
        self.write(|s| {
            match s.candidatures.iter_mut().find(|c| c.id == candidature.id) {
                Some(existing) if *existing == candidature => return,
                Some(existing) => *existing = candidature,
                None => s.candidatures.push(candidature),
            }
            s.bump();
        });
    }

    /// Replaces the record with the same id. Unknown ids are ignored.
    pub fn replace(&self, candidature: Candidature) -> bool {
        self.write(|s| match s.candidatures.iter_mut().find(|c| c.id == candidature.id) {
            Some(existing) => {
                if *existing != candidature {
                    *existing = candidature;
                    s.bump();
                }
                true
            }
            None => false,
        })
    }

    pub fn remove(&self, id: i64) -> bool {
        self.write(|s| {
            let before = s.candidatures.len();
            s.candidatures.retain(|c| c.id != id);
            let removed = s.candidatures.len() != before;
            if removed {
                s.bump();
            }
            removed
        })
    }

    /// Drops everything. The version keeps moving forward so views built
    /// before the reset still notice it.
    pub fn reset(&self) {
        self.write(|s| {
            let version = s.version;
            *s = StoreState::default();
            s.version = version;
            s.bump();
        });
    }

    fn begin_load(&self) {
        self.write(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn finish_load(&self, result: std::result::Result<Vec<Candidature>, String>) {
        self.write(|s| {
            s.loading = false;
            match result {
                Ok(candidatures) => {
                    s.candidatures = candidatures;
                    s.bump();
                }
                Err(message) => s.error = Some(message),
            }
        });
    }
}

#[derive(Clone)]
pub struct CandidatureService {
    api: ApiClient,
    store: CandidatureStore,
}

impl CandidatureService {
    pub fn new(api: ApiClient, store: CandidatureStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &CandidatureStore {
        &self.store
    }

    /// Fetches the whole collection and replaces the local copy. Entries
    /// that fail to decode are skipped.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<Candidature>> {
        self.store.begin_load();
        match self.api.get_json::<Vec<Value>>(COLLECTION).await {
            Ok(raw) => {
                let candidatures = decode_list(raw);
                info!(count = candidatures.len(), "Candidatures loaded");
                self.store.finish_load(Ok(candidatures.clone()));
                Ok(candidatures)
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Erreur lors du chargement".to_string());
                self.store.finish_load(Err(message));
                Err(e)
            }
        }
    }

    pub async fn reload(&self) -> Result<Vec<Candidature>> {
        self.load_all().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Candidature> {
        self.api.get_json(&format!("{}/{}", COLLECTION, id)).await
    }

    #[instrument(skip(self, payload), fields(company = %payload.company))]
    pub async fn create(&self, payload: &CandidaturePayload) -> Result<Candidature> {
        payload.validate()?;
        let created: Candidature = self.api.post_json(COLLECTION, payload).await?;
        info!(id = created.id, "Candidature created");
        self.store.push(created.clone());
        Ok(created)
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i64, payload: &CandidaturePayload) -> Result<Candidature> {
        payload.validate()?;
        let updated: Candidature = self
            .api
            .put_json(&format!("{}/{}", COLLECTION, id), payload)
            .await?;
        self.store.replace(updated.clone());
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("{}/{}", COLLECTION, id)).await?;
        self.store.remove(id);
        info!(id, "Candidature deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<Candidature> {
        let updated: Candidature = self
            .api
            .patch_json(
                &format!("{}/{}/statut", COLLECTION, id),
                &StatusUpdatePayload { status },
            )
            .await?;
        self.store.replace(updated.clone());
        Ok(updated)
    }

    /// Flips the archived flag through a full update.
    #[instrument(skip(self))]
    pub async fn toggle_archive(&self, id: i64) -> Result<Candidature> {
        let current = match self.store.get(id) {
            Some(c) => c,
            None => self.get(id).await?,
        };
        let mut payload = CandidaturePayload::from(&current);
        payload.archived = !current.archived;
        let updated: Candidature = self
            .api
            .put_json(&format!("{}/{}", COLLECTION, id), &payload)
            .await?;
        if !self.store.replace(updated.clone()) {
            warn!(id, "Archived record was not in the local store");
        }
        Ok(updated)
    }

    pub fn reset(&self) {
        self.store.reset();
    }
}

fn decode_list(raw: Vec<Value>) -> Vec<Candidature> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Candidature>(value) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed candidature");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample(id: i64, status: ApplicationStatus, archived: bool) -> Candidature {
        let mut c = Candidature::new(
            id,
            "Acme",
            "Dev",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status,
        );
        c.archived = archived;
        c
    }

    #[test]
    fn derived_counts() {
        let store = CandidatureStore::new();
        store.set_all(vec![
            sample(1, ApplicationStatus::Applied, false),
            sample(2, ApplicationStatus::Applied, true),
            sample(3, ApplicationStatus::Offer, false),
        ]);
        assert_eq!(store.total(), 3);
        assert_eq!(store.total_active(), 2);
        let grouped = store.by_status();
        assert_eq!(grouped[&ApplicationStatus::Applied].len(), 2);
        assert_eq!(grouped[&ApplicationStatus::Offer].len(), 1);
    }

    #[test]
    fn replace_and_remove_patch_in_place() {
        let store = CandidatureStore::new();
        store.set_all(vec![
            sample(1, ApplicationStatus::Applied, false),
            sample(2, ApplicationStatus::Applied, false),
        ]);
        assert!(store.replace(sample(2, ApplicationStatus::Rejected, false)));
        assert!(!store.replace(sample(9, ApplicationStatus::Rejected, false)));
        assert_eq!(store.get(2).map(|c| c.status), Some(ApplicationStatus::Rejected));
        assert_eq!(store.all().iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

        assert!(store.remove(1));
        assert!(!store.remove(1));
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn version_moves_only_on_record_changes() {
        let store = CandidatureStore::new();
        let shared = store.clone();
        store.set_all(vec![sample(1, ApplicationStatus::Applied, false)]);
        let v1 = shared.version();
        assert!(v1 > 0);

        store.set_all(vec![sample(1, ApplicationStatus::Applied, false)]);
        assert!(!store.replace(sample(5, ApplicationStatus::Offer, false)));
        assert!(store.replace(sample(1, ApplicationStatus::Applied, false)));
        assert_eq!(shared.version(), v1);

        store.upsert(sample(1, ApplicationStatus::Offer, false));
        assert_eq!(shared.version(), v1 + 1);
        store.upsert(sample(2, ApplicationStatus::Offer, false));
        assert_eq!(shared.total(), 2);

        store.begin_load();
        assert_eq!(shared.version(), v1 + 2);
        store.reset();
        assert!(shared.version() > v1 + 2);
        assert_eq!(shared.total(), 0);
    }

    #[test]
    fn failed_load_keeps_previous_records() {
        let store = CandidatureStore::new();
        store.set_all(vec![sample(1, ApplicationStatus::Applied, false)]);
        store.begin_load();
        assert!(store.is_loading());
        store.finish_load(Err("boom".into()));
        assert!(!store.is_loading());
        assert_eq!(store.error().as_deref(), Some("boom"));
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let raw = vec![
            json!({"id": 1, "entreprise": "A", "poste": "P", "dateCandidature": "2024-01-01", "statut": "APPLIQUEE"}),
            json!({"id": "oops"}),
            json!({"id": 3, "entreprise": "C", "poste": "P", "dateCandidature": "2024-01-03", "statut": "INCONNU"}),
        ];
        let decoded = decode_list(raw);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, 1);
    }
}
