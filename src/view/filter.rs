use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::candidature::{Candidature, CandidatureField};
use crate::models::enums::{ApplicationStatus, ContractType, Priority};
use crate::registry::EnumDisplay;
use crate::utils::array::{matches_search, normalize_search_term};
use crate::utils::time::format_date_fr;

/// Fields scanned by the free-text search box.
pub const SEARCH_FIELDS: &[CandidatureField] = &[
    CandidatureField::Company,
    CandidatureField::Position,
    CandidatureField::Location,
    CandidatureField::Source,
    CandidatureField::Description,
];

pub const SCORE_FLOOR: u8 = 0;
pub const SCORE_CEILING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub status: Option<ApplicationStatus>,
    pub priority: Option<Priority>,
    pub contract_type: Option<ContractType>,
    pub score_min: u8,
    pub score_max: u8,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub show_archived: bool,
    pub show_non_archived: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: None,
            priority: None,
            contract_type: None,
            score_min: SCORE_FLOOR,
            score_max: SCORE_CEILING,
            date_from: None,
            date_to: None,
            show_archived: false,
            show_non_archived: true,
        }
    }
}

/// One removable filter, as shown in the active-filter summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Search,
    Status,
    Priority,
    ContractType,
    Score,
    DateFrom,
    DateTo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub kind: FilterKind,
    pub label: String,
}

impl FilterCriteria {
    pub fn score_filter_active(&self) -> bool {
        self.score_min > SCORE_FLOOR || self.score_max < SCORE_CEILING
    }

    /// True when `c` passes every active criterion.
    pub fn matches(&self, c: &Candidature) -> bool {
        let needle = normalize_search_term(&self.search_term);
        self.matches_with_needle(c, &needle)
    }

    fn matches_with_needle(&self, c: &Candidature, needle: &str) -> bool {
        matches_search(c, needle, SEARCH_FIELDS)
            && self.status.map_or(true, |s| c.status == s)
            && self.priority.map_or(true, |p| c.priority == Some(p))
            && self.contract_type.map_or(true, |t| c.contract_type == Some(t))
            && self.matches_score(c)
            && self.date_from.map_or(true, |from| c.application_date >= from)
            && self.date_to.map_or(true, |to| c.application_date <= to)
            && self.matches_archive(c)
    }

    fn matches_score(&self, c: &Candidature) -> bool {
        if !self.score_filter_active() {
            return true;
        }
        // Unscored records count as zero.
        let score = c.score.unwrap_or(0);
        score >= self.score_min && score <= self.score_max
    }

    fn matches_archive(&self, c: &Candidature) -> bool {
        (self.show_non_archived && !c.archived) || (self.show_archived && c.archived)
    }

    /// Records passing the filter, in input order.
    pub fn apply(&self, items: &[Candidature]) -> Vec<Candidature> {
        let needle = normalize_search_term(&self.search_term);
        items
            .iter()
            .filter(|c| self.matches_with_needle(c, &needle))
            .cloned()
            .collect()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Archive toggles are not counted.
    pub fn active_filter_count(&self) -> usize {
        self.chips().len()
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if !self.search_term.is_empty() {
            chips.push(FilterChip {
                kind: FilterKind::Search,
                label: format!("\"{}\"", self.search_term),
            });
        }
        if let Some(status) = self.status {
            chips.push(FilterChip {
                kind: FilterKind::Status,
                label: status.label().to_string(),
            });
        }
        if let Some(priority) = self.priority {
            chips.push(FilterChip {
                kind: FilterKind::Priority,
                label: priority.label().to_string(),
            });
        }
        if let Some(contract_type) = self.contract_type {
            chips.push(FilterChip {
                kind: FilterKind::ContractType,
                label: contract_type.label().to_string(),
            });
        }
        if self.score_filter_active() {
            chips.push(FilterChip {
                kind: FilterKind::Score,
                label: format!("Score {}-{}", self.score_min, self.score_max),
            });
        }
        if let Some(from) = self.date_from {
            chips.push(FilterChip {
                kind: FilterKind::DateFrom,
                label: format!("Depuis le {}", format_date_fr(from)),
            });
        }
        if let Some(to) = self.date_to {
            chips.push(FilterChip {
                kind: FilterKind::DateTo,
                label: format!("Jusqu'au {}", format_date_fr(to)),
            });
        }
        chips
    }

    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search_term.clear(),
            FilterKind::Status => self.status = None,
            FilterKind::Priority => self.priority = None,
            FilterKind::ContractType => self.contract_type = None,
            FilterKind::Score => {
                self.score_min = SCORE_FLOOR;
                self.score_max = SCORE_CEILING;
            }
            FilterKind::DateFrom => self.date_from = None,
            FilterKind::DateTo => self.date_to = None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
