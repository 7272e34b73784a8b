//! Display metadata (label, color, icon) for every closed enumeration.
//!
//! Lookups are total: a variant without a configured color or icon
//! resolves to the per-enumeration fallback.

use serde::Serialize;

use crate::models::enums::{
    ApplicationStatus, ContactChannel, ContractType, Priority, RemunerationType, TeleworkType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumConfig<T> {
    pub value: T,
    pub label: &'static str,
    pub color: Option<&'static str>,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: &'static str,
}

pub trait EnumDisplay: Copy + Sized + 'static {
    const FALLBACK_COLOR: &'static str;
    const FALLBACK_ICON: &'static str;

    fn variants() -> &'static [Self];

    fn label(self) -> &'static str;

    fn color(self) -> Option<&'static str> {
        None
    }

    fn icon(self) -> Option<&'static str> {
        None
    }

    fn resolved_color(self) -> &'static str {
        self.color().unwrap_or(Self::FALLBACK_COLOR)
    }

    fn resolved_icon(self) -> &'static str {
        self.icon().unwrap_or(Self::FALLBACK_ICON)
    }

    fn config(self) -> EnumConfig<Self> {
        EnumConfig {
            value: self,
            label: self.label(),
            color: self.color(),
            icon: self.icon(),
        }
    }

    fn configs() -> Vec<EnumConfig<Self>> {
        Self::variants().iter().map(|v| v.config()).collect()
    }

    /// Options for a select input, in declaration order.
    fn options() -> Vec<SelectOption<Self>> {
        Self::variants()
            .iter()
            .map(|v| SelectOption {
                value: *v,
                label: v.label(),
            })
            .collect()
    }
}

impl EnumDisplay for ApplicationStatus {
    const FALLBACK_COLOR: &'static str = "#64748b";
    const FALLBACK_ICON: &'static str = "fas fa-question-circle";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Postulée",
            ApplicationStatus::PhoneInterview => "Entretien Téléphonique",
            ApplicationStatus::TechnicalInterview => "Entretien Technique",
            ApplicationStatus::HrInterview => "Entretien RH",
            ApplicationStatus::Offer => "Offre Reçue",
            ApplicationStatus::Rejected => "Refusée",
            ApplicationStatus::NoResponse => "Sans Réponse",
        }
    }

    fn color(self) -> Option<&'static str> {
        Some(match self {
            ApplicationStatus::Applied => "#8b5cf6",
            ApplicationStatus::PhoneInterview => "#3b82f6",
            ApplicationStatus::TechnicalInterview => "#06b6d4",
            ApplicationStatus::HrInterview => "#10b981",
            ApplicationStatus::Offer => "#22c55e",
            ApplicationStatus::Rejected => "#ef4444",
            ApplicationStatus::NoResponse => "#64748b",
        })
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            ApplicationStatus::Applied => "fas fa-paper-plane",
            ApplicationStatus::PhoneInterview => "fas fa-phone",
            ApplicationStatus::TechnicalInterview => "fas fa-laptop-code",
            ApplicationStatus::HrInterview => "fas fa-users",
            ApplicationStatus::Offer => "fas fa-gift",
            ApplicationStatus::Rejected => "fas fa-times-circle",
            ApplicationStatus::NoResponse => "fas fa-question-circle",
        })
    }
}

impl EnumDisplay for Priority {
    const FALLBACK_COLOR: &'static str = "gray";
    const FALLBACK_ICON: &'static str = "fas fa-flag";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            Priority::Low => "Basse",
            Priority::Medium => "Moyenne",
            Priority::High => "Haute",
        }
    }

    fn color(self) -> Option<&'static str> {
        Some(match self {
            Priority::Low => "gray",
            Priority::Medium => "yellow",
            Priority::High => "red",
        })
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            Priority::Low => "fas fa-arrow-down",
            Priority::Medium => "fas fa-equals",
            Priority::High => "fas fa-arrow-up",
        })
    }
}

impl EnumDisplay for ContractType {
    const FALLBACK_COLOR: &'static str = "gray";
    const FALLBACK_ICON: &'static str = "fas fa-file-contract";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            ContractType::Cdi => "CDI",
            ContractType::Cdd => "CDD",
            ContractType::Freelance => "Freelance",
            ContractType::Internship => "Stage",
            ContractType::WorkStudy => "Alternance",
            ContractType::Temporary => "Intérim",
        }
    }

    fn color(self) -> Option<&'static str> {
        Some(match self {
            ContractType::Cdi => "green",
            ContractType::Cdd => "blue",
            ContractType::Freelance => "purple",
            ContractType::Internship => "yellow",
            ContractType::WorkStudy => "indigo",
            ContractType::Temporary => "orange",
        })
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            ContractType::Cdi => "fas fa-briefcase",
            ContractType::Cdd => "fas fa-calendar-alt",
            ContractType::Freelance => "fas fa-user-tie",
            ContractType::Internship => "fas fa-graduation-cap",
            ContractType::WorkStudy => "fas fa-exchange-alt",
            ContractType::Temporary => "fas fa-clock",
        })
    }
}

impl EnumDisplay for ContactChannel {
    const FALLBACK_COLOR: &'static str = "gray";
    const FALLBACK_ICON: &'static str = "fas fa-comment";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            ContactChannel::Email => "Email",
            ContactChannel::Linkedin => "LinkedIn",
            ContactChannel::Phone => "Téléphone",
            ContactChannel::Website => "Site Web",
        }
    }

    fn color(self) -> Option<&'static str> {
        Some(match self {
            ContactChannel::Email => "blue",
            ContactChannel::Linkedin => "indigo",
            ContactChannel::Phone => "green",
            ContactChannel::Website => "purple",
        })
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            ContactChannel::Email => "fas fa-envelope",
            ContactChannel::Linkedin => "fab fa-linkedin",
            ContactChannel::Phone => "fas fa-phone",
            ContactChannel::Website => "fas fa-globe",
        })
    }
}

// Remuneration types carry no color of their own.
impl EnumDisplay for RemunerationType {
    const FALLBACK_COLOR: &'static str = "gray";
    const FALLBACK_ICON: &'static str = "fas fa-euro-sign";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            RemunerationType::Annual => "Annuel",
            RemunerationType::Monthly => "Mensuel",
            RemunerationType::Hourly => "Horaire",
        }
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            RemunerationType::Annual => "fas fa-calendar",
            RemunerationType::Monthly => "fas fa-calendar-days",
            RemunerationType::Hourly => "fas fa-clock",
        })
    }
}

impl RemunerationType {
    /// Short unit appended to a salary amount.
    pub fn suffix(self) -> &'static str {
        match self {
            RemunerationType::Annual => "/an",
            RemunerationType::Monthly => "/mois",
            RemunerationType::Hourly => "/h",
        }
    }
}

impl EnumDisplay for TeleworkType {
    const FALLBACK_COLOR: &'static str = "gray";
    const FALLBACK_ICON: &'static str = "fas fa-laptop-house";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn label(self) -> &'static str {
        match self {
            TeleworkType::Full => "Télétravail complet",
            TeleworkType::Partial => "Télétravail partiel",
            TeleworkType::OnSite => "Aucun télétravail",
        }
    }

    fn color(self) -> Option<&'static str> {
        Some(match self {
            TeleworkType::Full => "green",
            TeleworkType::Partial => "blue",
            TeleworkType::OnSite => "gray",
        })
    }

    fn icon(self) -> Option<&'static str> {
        Some(match self {
            TeleworkType::Full => "fas fa-home",
            TeleworkType::Partial => "fas fa-calendar-week",
            TeleworkType::OnSite => "fas fa-building",
        })
    }
}

/// Resolves a raw status code (as found in statistics payloads) to its
/// label, color and icon. Unknown codes keep the raw code as label and get
/// the status fallbacks.
pub fn status_display(code: &str) -> (String, &'static str, &'static str) {
    match code.parse::<ApplicationStatus>() {
        Ok(status) => (
            status.label().to_string(),
            status.resolved_color(),
            status.resolved_icon(),
        ),
        Err(_) => (
            code.to_string(),
            ApplicationStatus::FALLBACK_COLOR,
            ApplicationStatus::FALLBACK_ICON,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complete<T: EnumDisplay + std::fmt::Debug>() {
        for variant in T::variants() {
            assert!(!variant.label().is_empty(), "{:?} has no label", variant);
            assert!(!variant.resolved_color().is_empty());
            assert!(!variant.resolved_icon().is_empty());
        }
        assert_eq!(T::options().len(), T::variants().len());
    }

    #[test]
    fn every_variant_has_display_metadata() {
        assert_complete::<ApplicationStatus>();
        assert_complete::<Priority>();
        assert_complete::<ContractType>();
        assert_complete::<ContactChannel>();
        assert_complete::<RemunerationType>();
        assert_complete::<TeleworkType>();
    }

    #[test]
    fn status_metadata() {
        let offer = ApplicationStatus::Offer.config();
        assert_eq!(offer.label, "Offre Reçue");
        assert_eq!(offer.color, Some("#22c55e"));
        assert_eq!(offer.icon, Some("fas fa-gift"));
    }

    #[test]
    fn remuneration_falls_back_for_color() {
        assert_eq!(RemunerationType::Monthly.color(), None);
        assert_eq!(RemunerationType::Monthly.resolved_color(), "gray");
        assert_eq!(RemunerationType::Hourly.suffix(), "/h");
    }

    #[test]
    fn options_keep_declaration_order() {
        let labels: Vec<_> = ContactChannel::options().iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Email", "LinkedIn", "Téléphone", "Site Web"]);
    }

    #[test]
    fn unknown_status_code_uses_fallbacks() {
        let (label, color, icon) = status_display("EN_PAUSE");
        assert_eq!(label, "EN_PAUSE");
        assert_eq!(color, "#64748b");
        assert_eq!(icon, "fas fa-question-circle");
    }
}
