use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::{Storage, COLUMNS_KEY};
use crate::view::columns::{ColumnPreference, ColumnSet};

/// Persists column order and visibility under a single storage key.
#[derive(Clone)]
pub struct ColumnPreferenceStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl ColumnPreferenceStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, COLUMNS_KEY)
    }

    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Applies stored preferences onto `columns`. Missing or undecodable
    /// preferences leave the defaults untouched. Returns whether anything
    /// was applied.
    pub fn load_into(&self, columns: &mut ColumnSet) -> bool {
        match self.storage.get_json::<Vec<ColumnPreference>>(&self.key) {
            Some(prefs) => {
                columns.apply_preferences(&prefs);
                debug!(count = prefs.len(), "Column preferences restored");
                true
            }
            None => false,
        }
    }

    /// Failures are logged, never surfaced.
    pub fn save(&self, columns: &ColumnSet) {
        if let Err(e) = self.storage.set_json(&self.key, &columns.preferences()) {
            warn!(error = %e, "Failed to save column preferences");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            warn!(error = %e, "Failed to clear column preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::{MemoryStorage, MockStorage};

    #[test]
    fn save_then_load_round_trips_layout() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = ColumnPreferenceStore::new(storage);

        let mut columns = ColumnSet::default();
        columns.toggle("source");
        columns.reorder(&["score"]);
        store.save(&columns);

        let mut restored = ColumnSet::default();
        assert!(store.load_into(&mut restored));
        assert_eq!(restored, columns);
    }

    #[test]
    fn corrupt_value_keeps_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set_item(COLUMNS_KEY, "[{\"key\": 1}").unwrap();
        let store = ColumnPreferenceStore::new(storage);

        let mut columns = ColumnSet::default();
        assert!(!store.load_into(&mut columns));
        assert_eq!(columns, ColumnSet::default());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut mock = MockStorage::new();
        mock.expect_set_item()
            .times(1)
            .returning(|_, _| Err(Error::Storage("quota exceeded".into())));
        let store = ColumnPreferenceStore::new(Arc::new(mock));
        store.save(&ColumnSet::default());
    }
}
