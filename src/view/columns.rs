use serde::{Deserialize, Serialize};

use crate::models::candidature::{Candidature, CandidatureField};
use crate::utils::array::{FieldValue, Record};

pub const ACTIONS_COLUMN: &str = "actions";

const RESET_VISIBLE: &[&str] = &[
    "entreprise",
    "poste",
    "localisation",
    "dateCandidature",
    "statut",
    ACTIONS_COLUMN,
];

const MINIMAL_VISIBLE: &[&str] = &["poste", ACTIONS_COLUMN];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub key: String,
    pub label: String,
    pub visible: bool,
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ColumnDefinition {
    fn new(key: &str, label: &str, visible: bool, sortable: bool, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            visible,
            sortable,
            width: None,
            icon: Some(icon.to_string()),
        }
    }

    fn with_width(mut self, width: &str) -> Self {
        self.width = Some(width.to_string());
        self
    }

    /// Record field backing this column, if it maps to a single one.
    pub fn field(&self) -> Option<CandidatureField> {
        CandidatureField::from_key(&self.key)
    }
}

/// Persisted form of a column: key and visibility, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreference {
    pub key: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ColumnDefinition>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::candidature_defaults()
    }
}

impl ColumnSet {
    pub fn candidature_defaults() -> Self {
        Self {
            columns: vec![
                ColumnDefinition::new("id", "ID", false, true, "fa-hashtag").with_width("80px"),
                ColumnDefinition::new("entreprise", "Entreprise", true, true, "fa-building"),
                ColumnDefinition::new("poste", "Poste", true, true, "fa-briefcase"),
                ColumnDefinition::new("localisation", "Localisation", true, true, "fa-map-marker-alt"),
                ColumnDefinition::new("typeContrat", "Type contrat", true, true, "fa-file-contract"),
                ColumnDefinition::new("dateCandidature", "Date candidature", true, true, "fa-calendar"),
                ColumnDefinition::new("statut", "Statut", true, true, "fa-flag"),
                ColumnDefinition::new("priorite", "Priorité", true, true, "fa-exclamation-triangle"),
                ColumnDefinition::new("salaire", "Salaire", false, false, "fa-euro-sign"),
                ColumnDefinition::new("score", "Score", true, true, "fa-star"),
                ColumnDefinition::new("source", "Source", false, true, "fa-link"),
                ColumnDefinition::new("contact", "Contact", false, false, "fa-user"),
                ColumnDefinition::new("description", "Description/Note", false, false, "fa-align-left"),
                ColumnDefinition::new("lienOffre", "Lien offre", false, false, "fa-external-link-alt"),
                ColumnDefinition::new(ACTIONS_COLUMN, "Actions", true, false, "fa-cog").with_width("140px"),
            ],
        }
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn visible(&self) -> Vec<&ColumnDefinition> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.visible().into_iter().map(|c| c.key.as_str()).collect()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.get(key).map(|c| c.visible).unwrap_or(false)
    }

    /// Sortable column key → record field.
    pub fn sort_field(&self, key: &str) -> Option<CandidatureField> {
        self.get(key).filter(|c| c.sortable).and_then(|c| c.field())
    }

    /// Flips one column's visibility. The actions column is fixed. Returns
    /// whether anything changed.
    pub fn toggle(&mut self, key: &str) -> bool {
        if key == ACTIONS_COLUMN {
            return false;
        }
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.visible = !column.visible;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.set_visible_only(RESET_VISIBLE);
    }

    pub fn show_all(&mut self) {
        for column in &mut self.columns {
            column.visible = true;
        }
    }

    /// Keeps only the position and actions columns.
    pub fn hide_optional(&mut self) {
        self.set_visible_only(MINIMAL_VISIBLE);
    }

    fn set_visible_only(&mut self, keys: &[&str]) {
        for column in &mut self.columns {
            column.visible = keys.contains(&column.key.as_str());
        }
    }

    /// Reorders by key. Each column keeps its visibility; unknown keys are
    /// ignored and columns missing from `order` keep their relative order
    /// after the listed ones.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) {
        let mut remaining = std::mem::take(&mut self.columns);
        let mut reordered = Vec::with_capacity(remaining.len());
        for key in order {
            if let Some(pos) = remaining.iter().position(|c| c.key == key.as_ref()) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.extend(remaining);
        self.columns = reordered;
    }

    /// Drag-and-drop move from one display index to another.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from >= self.columns.len() || to >= self.columns.len() || from == to {
            return false;
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        true
    }

    /// Case-insensitive label search, as used by the column picker.
    pub fn search(&self, term: &str) -> Vec<&ColumnDefinition> {
        let term = term.trim().to_lowercase();
        self.columns
            .iter()
            .filter(|c| term.is_empty() || c.label.to_lowercase().contains(&term))
            .collect()
    }

    pub fn preferences(&self) -> Vec<ColumnPreference> {
        self.columns
            .iter()
            .map(|c| ColumnPreference {
                key: c.key.clone(),
                visible: c.visible,
            })
            .collect()
    }

    /// Restores order and visibility. Unknown keys are skipped; columns the
    /// preferences do not mention keep their defaults and go last. The
    /// actions column is always visible.
    pub fn apply_preferences(&mut self, preferences: &[ColumnPreference]) {
        let order: Vec<&str> = preferences.iter().map(|p| p.key.as_str()).collect();
        self.reorder(&order);
        for pref in preferences {
            if let Some(column) = self.columns.iter_mut().find(|c| c.key == pref.key) {
                column.visible = pref.visible || column.key == ACTIONS_COLUMN;
            }
        }
    }

    /// Values of the visible columns for one record, in display order.
    pub fn project<'a>(&'a self, record: &Candidature) -> Vec<(&'a str, FieldValue)> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| (c.key.as_str(), column_value(record, &c.key)))
            .collect()
    }
}

/// Value displayed in a column. Composite columns are rendered to text.
pub fn column_value(record: &Candidature, key: &str) -> FieldValue {
    match key {
        "salaire" => salary_text(record).into(),
        "contact" => record
            .contact_name
            .clone()
            .or_else(|| record.contact_email.clone())
            .into(),
        ACTIONS_COLUMN => FieldValue::Null,
        other => CandidatureField::from_key(other)
            .map(|field| record.field(field))
            .unwrap_or(FieldValue::Null),
    }
}

fn salary_text(record: &Candidature) -> Option<String> {
    let range = match (record.salary_min, record.salary_max) {
        (Some(min), Some(max)) => format!("{} - {} €", min.normalize(), max.normalize()),
        (Some(min), None) => format!("{} €", min.normalize()),
        (None, Some(max)) => format!("{} €", max.normalize()),
        (None, None) => return None,
    };
    Some(match record.remuneration_type {
        Some(kind) => format!("{}{}", range, kind.suffix()),
        None => range,
    })
}
