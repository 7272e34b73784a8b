use serde::{Deserialize, Serialize};

use crate::models::candidature::{Candidature, CandidatureField};
use crate::utils::array::{sort_by_key, SortOrder};

/// Active sort column and direction. `None` means input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(CandidatureField, SortOrder)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortState {
    pub fn column(&self) -> Option<CandidatureField> {
        self.active.map(|(field, _)| field)
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.active.map(|(_, order)| order)
    }

    /// Cycles a column through ascending, descending, unsorted. A different
    /// column starts again at ascending.
    pub fn cycle(&mut self, field: CandidatureField) {
        self.active = match self.active {
            Some((current, SortOrder::Asc)) if current == field => Some((field, SortOrder::Desc)),
            Some((current, SortOrder::Desc)) if current == field => None,
            _ => Some((field, SortOrder::Asc)),
        };
    }

    /// Sets the sort explicitly; a missing order clears it.
    pub fn set(&mut self, field: CandidatureField, order: Option<SortOrder>) {
        self.active = order.map(|o| (field, o));
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn indicator(&self, field: CandidatureField) -> SortIndicator {
        match self.active {
            Some((current, SortOrder::Asc)) if current == field => SortIndicator::Ascending,
            Some((current, SortOrder::Desc)) if current == field => SortIndicator::Descending,
            _ => SortIndicator::Unsorted,
        }
    }

    pub fn apply(&self, items: Vec<Candidature>) -> Vec<Candidature> {
        match self.active {
            Some((field, order)) => sort_by_key(&items, field, order),
            None => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ApplicationStatus;
    use chrono::NaiveDate;

    #[test]
    fn cycle_goes_asc_desc_none() {
        let mut sort = SortState::default();
        sort.cycle(CandidatureField::Company);
        assert_eq!(sort.indicator(CandidatureField::Company), SortIndicator::Ascending);
        sort.cycle(CandidatureField::Company);
        assert_eq!(sort.indicator(CandidatureField::Company), SortIndicator::Descending);
        sort.cycle(CandidatureField::Company);
        assert_eq!(sort.column(), None);
    }

    #[test]
    fn switching_column_restarts_ascending() {
        let mut sort = SortState::default();
        sort.cycle(CandidatureField::Company);
        sort.cycle(CandidatureField::Company);
        sort.cycle(CandidatureField::Score);
        assert_eq!(sort.column(), Some(CandidatureField::Score));
        assert_eq!(sort.order(), Some(SortOrder::Asc));
        assert_eq!(sort.indicator(CandidatureField::Company), SortIndicator::Unsorted);
    }

    #[test]
    fn status_sorts_by_wire_code() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let items = vec![
            Candidature::new(1, "a", "p", day, ApplicationStatus::Rejected),
            Candidature::new(2, "b", "p", day, ApplicationStatus::Applied),
            Candidature::new(3, "c", "p", day, ApplicationStatus::Offer),
        ];
        let mut sort = SortState::default();
        sort.set(CandidatureField::Status, Some(SortOrder::Asc));
        let ids: Vec<i64> = sort.apply(items).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
