//! Derived, memoized view over the loaded applications.
//!
//! The records live in a shared [`CandidatureStore`]; service writes patch
//! it and every open view sees the change. Filter criteria and sort state
//! bump a local version counter when they actually change. [`ListView::visible`]
//! recomputes only when the store version or the local version moved, and
//! otherwise hands back the same `Arc`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::candidature::{Candidature, CandidatureField};
use crate::models::enums::{ApplicationStatus, ContractType, Priority};
use crate::notifications::Notifications;
use crate::preferences::ColumnPreferenceStore;
use crate::services::candidature_service::CandidatureStore;
use crate::utils::array::{paginate, pagination_info, FieldValue, PaginationInfo, SortOrder};
use crate::view::columns::{ColumnDefinition, ColumnSet};
use crate::view::filter::{FilterChip, FilterCriteria, FilterKind};
use crate::view::sort::{SortIndicator, SortState};

pub struct ListView {
    store: CandidatureStore,
    criteria: FilterCriteria,
    sort: SortState,
    columns: ColumnSet,
    version: u64,
    cache: Option<((u64, u64), Arc<Vec<Candidature>>)>,
    preferences: Option<ColumnPreferenceStore>,
    notifications: Option<Notifications>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ListView {
    /// View over a private store holding `records`.
    pub fn new(records: Vec<Candidature>) -> Self {
        let store = CandidatureStore::new();
        store.set_all(records);
        Self::over(store)
    }

    /// View over a shared store.
    pub fn over(store: CandidatureStore) -> Self {
        Self {
            store,
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            columns: ColumnSet::candidature_defaults(),
            version: 0,
            cache: None,
            preferences: None,
            notifications: None,
        }
    }

    /// Restores saved column preferences and persists every later column
    /// change.
    pub fn with_preferences(mut self, store: ColumnPreferenceStore) -> Self {
        store.load_into(&mut self.columns);
        self.preferences = Some(store);
        self
    }

    /// Confirmation toasts for bulk column and filter resets.
    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = Some(notifications);
        self
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn update_criteria(&mut self, f: impl FnOnce(&mut FilterCriteria)) {
        let before = self.criteria.clone();
        f(&mut self.criteria);
        if self.criteria != before {
            self.bump();
        }
    }

    fn update_columns(&mut self, f: impl FnOnce(&mut ColumnSet)) {
        let before = self.columns.clone();
        f(&mut self.columns);
        if self.columns != before {
            if let Some(store) = &self.preferences {
                store.save(&self.columns);
            }
        }
    }

    fn notify(&self, message: &str) {
        if let Some(notifications) = &self.notifications {
            notifications.success(message);
        }
    }

    /// Combined store and view version; moves whenever the rows may differ.
    pub fn version(&self) -> (u64, u64) {
        (self.store.version(), self.version)
    }

    // ---- records ----

    pub fn store(&self) -> &CandidatureStore {
        &self.store
    }

    pub fn records(&self) -> Vec<Candidature> {
        self.store.all()
    }

    pub fn set_records(&mut self, records: Vec<Candidature>) {
        self.store.set_all(records);
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert(&mut self, record: Candidature) {
        self.store.upsert(record);
    }

    /// Patches an existing record; unknown ids are ignored.
    pub fn replace(&mut self, record: Candidature) -> bool {
        self.store.replace(record)
    }

    pub fn remove(&mut self, id: i64) -> bool {
        self.store.remove(id)
    }

    pub fn find(&self, id: i64) -> Option<Candidature> {
        self.store.get(id)
    }

    // ---- filters ----

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.update_criteria(|c| c.search_term = term);
    }

    pub fn set_status(&mut self, status: Option<ApplicationStatus>) {
        self.update_criteria(|c| c.status = status);
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.update_criteria(|c| c.priority = priority);
    }

    pub fn set_contract_type(&mut self, contract_type: Option<ContractType>) {
        self.update_criteria(|c| c.contract_type = contract_type);
    }

    pub fn set_score_range(&mut self, min: u8, max: u8) {
        self.update_criteria(|c| {
            c.score_min = min;
            c.score_max = max;
        });
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.update_criteria(|c| {
            c.date_from = from;
            c.date_to = to;
        });
    }

    pub fn set_show_archived(&mut self, show: bool) {
        self.update_criteria(|c| c.show_archived = show);
    }

    pub fn set_show_non_archived(&mut self, show: bool) {
        self.update_criteria(|c| c.show_non_archived = show);
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.update_criteria(|c| *c = criteria);
    }

    pub fn clear_filter(&mut self, kind: FilterKind) {
        self.update_criteria(|c| c.clear(kind));
    }

    pub fn clear_filters(&mut self) {
        self.update_criteria(FilterCriteria::reset);
        self.notify("Filtres réinitialisés");
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_filter_count()
    }

    pub fn filter_chips(&self) -> Vec<FilterChip> {
        self.criteria.chips()
    }

    // ---- sorting ----

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Header click. Unknown or non-sortable columns are ignored.
    pub fn sort_by(&mut self, column_key: &str) -> bool {
        let Some(field) = self.columns.sort_field(column_key) else {
            debug!(column = column_key, "Ignoring sort on non-sortable column");
            return false;
        };
        self.sort.cycle(field);
        self.bump();
        true
    }

    pub fn set_sort(&mut self, field: CandidatureField, order: Option<SortOrder>) {
        let before = self.sort;
        self.sort.set(field, order);
        if self.sort != before {
            self.bump();
        }
    }

    pub fn sort_indicator(&self, column_key: &str) -> SortIndicator {
        match self.columns.get(column_key).and_then(ColumnDefinition::field) {
            Some(field) => self.sort.indicator(field),
            None => SortIndicator::Unsorted,
        }
    }

    // ---- derived rows ----

    /// Filtered then sorted records. Returns the cached `Arc` when no input
    /// changed since the last call.
    pub fn visible(&mut self) -> Arc<Vec<Candidature>> {
        let version = self.version();
        if let Some((cached, rows)) = &self.cache {
            if *cached == version {
                return Arc::clone(rows);
            }
        }
        let records = self.store.all();
        let filtered = self.criteria.apply(&records);
        let rows = Arc::new(self.sort.apply(filtered));
        debug!(
            store_version = version.0,
            view_version = version.1,
            total = records.len(),
            visible = rows.len(),
            "List view recomputed"
        );
        self.cache = Some((version, Arc::clone(&rows)));
        rows
    }

    pub fn visible_count(&mut self) -> usize {
        self.visible().len()
    }

    pub fn page(&mut self, page: usize, page_size: usize) -> (Vec<Candidature>, PaginationInfo) {
        let rows = self.visible();
        (
            paginate(&rows, page, page_size),
            pagination_info(rows.len(), page, page_size),
        )
    }

    /// Visible rows projected onto the visible columns.
    pub fn rows(&mut self) -> Vec<Vec<(String, FieldValue)>> {
        let visible = self.visible();
        visible
            .iter()
            .map(|record| {
                self.columns
                    .project(record)
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect()
            })
            .collect()
    }

    // ---- columns ----

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDefinition> {
        self.columns.visible()
    }

    pub fn toggle_column(&mut self, key: &str) -> bool {
        let mut changed = false;
        self.update_columns(|c| changed = c.toggle(key));
        changed
    }

    pub fn reset_columns(&mut self) {
        self.update_columns(ColumnSet::reset);
        self.notify("Colonnes réinitialisées");
    }

    pub fn show_all_columns(&mut self) {
        self.update_columns(ColumnSet::show_all);
        self.notify("Toutes les colonnes affichées");
    }

    pub fn hide_optional_columns(&mut self) {
        self.update_columns(ColumnSet::hide_optional);
        self.notify("Colonnes optionnelles masquées (poste et actions toujours visibles)");
    }

    pub fn reorder_columns<S: AsRef<str>>(&mut self, order: &[S]) {
        self.update_columns(|c| c.reorder(order));
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        let mut moved = false;
        self.update_columns(|c| moved = c.move_column(from, to));
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use crate::view::columns::ACTIONS_COLUMN;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn records() -> Vec<Candidature> {
        let mut a = Candidature::new(1, "Zenith", "Dev", date(3), ApplicationStatus::Applied);
        a.score = Some(5);
        let mut b = Candidature::new(2, "Acme", "Ops", date(1), ApplicationStatus::Offer);
        b.score = Some(2);
        let mut c = Candidature::new(3, "Mango", "Data", date(2), ApplicationStatus::Rejected);
        c.archived = true;
        vec![a, b, c]
    }

    fn ids(rows: &[Candidature]) -> Vec<i64> {
        rows.iter().map(|c| c.id).collect()
    }

    #[test]
    fn visible_is_memoized_until_inputs_change() {
        let mut view = ListView::new(records());
        let first = view.visible();
        let second = view.visible();
        assert!(Arc::ptr_eq(&first, &second));

        view.set_search_term("");
        assert!(Arc::ptr_eq(&first, &view.visible()));

        view.set_search_term("acme");
        let third = view.visible();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(ids(&third), vec![2]);
    }

    #[test]
    fn column_changes_do_not_invalidate_rows() {
        let mut view = ListView::new(records());
        let before = view.visible();
        view.toggle_column("source");
        view.reorder_columns(&["score"]);
        assert!(Arc::ptr_eq(&before, &view.visible()));
    }

    #[test]
    fn sort_cycles_through_header_clicks() {
        let mut view = ListView::new(records());
        assert!(view.sort_by("entreprise"));
        assert_eq!(ids(&view.visible()), vec![2, 1]);
        assert_eq!(view.sort_indicator("entreprise"), SortIndicator::Ascending);

        view.sort_by("entreprise");
        assert_eq!(ids(&view.visible()), vec![1, 2]);

        view.sort_by("entreprise");
        assert_eq!(view.sort_indicator("entreprise"), SortIndicator::Unsorted);
        assert_eq!(ids(&view.visible()), vec![1, 2]);
    }

    #[test]
    fn non_sortable_columns_are_ignored() {
        let mut view = ListView::new(records());
        let version = view.version();
        assert!(!view.sort_by("salaire"));
        assert!(!view.sort_by(ACTIONS_COLUMN));
        assert!(!view.sort_by("unknown"));
        assert_eq!(view.version(), version);
    }

    #[test]
    fn upsert_patches_in_place() {
        let mut view = ListView::new(records());
        view.sort_by("score");
        let mut updated = view.find(2).unwrap();
        updated.score = Some(5);
        view.upsert(updated);
        assert_eq!(view.records().len(), 3);
        assert_eq!(ids(&view.visible()), vec![1, 2]);
        assert_eq!(view.find(2).and_then(|c| c.score), Some(5));
    }

    #[test]
    fn replace_ignores_unknown_ids() {
        let mut view = ListView::new(records());
        let version = view.version();
        let stranger = Candidature::new(42, "Nobody", "Dev", date(4), ApplicationStatus::Applied);
        assert!(!view.replace(stranger));
        assert_eq!(view.version(), version);

        let mut known = view.find(1).unwrap();
        known.archived = true;
        assert!(view.replace(known));
        assert_eq!(ids(&view.visible()), vec![2]);
    }

    #[test]
    fn writes_to_the_shared_store_invalidate_rows() {
        let store = CandidatureStore::new();
        store.set_all(records());
        let mut view = ListView::over(store.clone());
        let before = view.visible();
        assert_eq!(ids(&before), vec![1, 2]);

        let mut archived = store.get(1).unwrap();
        archived.archived = true;
        assert!(store.replace(archived));
        let after = view.visible();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(ids(&after), vec![2]);

        store.remove(2);
        assert!(view.visible().is_empty());
    }

    #[test]
    fn archived_toggle_and_remove() {
        let mut view = ListView::new(records());
        view.set_show_archived(true);
        assert_eq!(view.visible_count(), 3);
        assert!(view.remove(3));
        assert!(!view.remove(3));
        assert_eq!(view.visible_count(), 2);
    }

    #[test]
    fn clear_filters_resets_and_notifies() {
        let notifications = Notifications::new();
        let mut view = ListView::new(records()).with_notifications(notifications.clone());
        view.set_status(Some(ApplicationStatus::Offer));
        view.set_show_non_archived(false);
        assert_eq!(view.visible_count(), 0);

        view.clear_filters();
        assert_eq!(view.criteria(), &FilterCriteria::default());
        assert_eq!(view.visible_count(), 2);
        assert_eq!(
            notifications.messages(crate::notifications::ToastKind::Success),
            vec!["Filtres réinitialisés".to_string()]
        );
    }

    #[test]
    fn column_changes_are_persisted() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut view = ListView::new(records())
            .with_preferences(ColumnPreferenceStore::new(storage.clone()));
        view.hide_optional_columns();

        let restored =
            ListView::new(Vec::new()).with_preferences(ColumnPreferenceStore::new(storage));
        assert_eq!(restored.columns().visible_keys(), vec!["poste", "actions"]);
    }

    #[test]
    fn paging_uses_visible_rows() {
        let mut view = ListView::new(records());
        view.set_show_archived(true);
        let (rows, info) = view.page(2, 2);
        assert_eq!(ids(&rows), vec![3]);
        assert_eq!(info.total_items, 3);
        assert!(!info.has_next);
    }

    #[test]
    fn rows_project_visible_columns() {
        let mut view = ListView::new(records());
        view.hide_optional_columns();
        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], ("poste".to_string(), FieldValue::Text("Dev".into())));
    }
}
