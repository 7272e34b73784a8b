use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::enums::{
    ApplicationStatus, ContactChannel, ContractType, Priority, RemunerationType, TeleworkType,
};
use crate::utils::array::{FieldValue, Record};
use crate::utils::nullable::null_as_default;
use crate::utils::time::{lenient_date, lenient_date_opt};

/// A job application as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidature {
    pub id: i64,
    #[serde(rename = "entreprise")]
    pub company: String,
    #[serde(rename = "poste")]
    pub position: String,
    #[serde(rename = "localisation", default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(rename = "lienOffre", default, skip_serializing_if = "Option::is_none")]
    pub offer_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "dateCandidature", with = "lenient_date")]
    pub application_date: NaiveDate,
    #[serde(
        rename = "dateDernierContact",
        default,
        with = "lenient_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_contact_date: Option<NaiveDate>,
    #[serde(
        rename = "dateRelancePrevue",
        default,
        with = "lenient_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(rename = "statut")]
    pub status: ApplicationStatus,
    #[serde(rename = "priorite", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "archivee", default, deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(rename = "contactNom", default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(rename = "contactEmail", default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(rename = "contactTelephone", default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(rename = "contactLinkedin", default, skip_serializing_if = "Option::is_none")]
    pub contact_linkedin: Option<String>,
    #[serde(rename = "contactSite", default, skip_serializing_if = "Option::is_none")]
    pub contact_site: Option<String>,
    #[serde(rename = "canalContact", default, skip_serializing_if = "Option::is_none")]
    pub contact_channel: Option<ContactChannel>,
    #[serde(rename = "typeContrat", default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(
        rename = "salaireMin",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_min: Option<Decimal>,
    #[serde(
        rename = "salaireMax",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_max: Option<Decimal>,
    #[serde(rename = "typeRemuneration", default, skip_serializing_if = "Option::is_none")]
    pub remuneration_type: Option<RemunerationType>,
    #[serde(rename = "typeTeletravail", default, skip_serializing_if = "Option::is_none")]
    pub telework_type: Option<TeleworkType>,
    #[serde(
        rename = "joursTeletravailParSemaine",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub telework_days_per_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "userId", default, deserialize_with = "null_as_default")]
    pub user_id: i64,
}

impl Candidature {
    /// Minimal record with only the required fields set.
    pub fn new(
        id: i64,
        company: impl Into<String>,
        position: impl Into<String>,
        application_date: NaiveDate,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            id,
            company: company.into(),
            position: position.into(),
            location: String::new(),
            offer_link: None,
            description: None,
            application_date,
            last_contact_date: None,
            follow_up_date: None,
            status,
            priority: None,
            archived: false,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            contact_linkedin: None,
            contact_site: None,
            contact_channel: None,
            contract_type: None,
            salary_min: None,
            salary_max: None,
            remuneration_type: None,
            telework_type: None,
            telework_days_per_week: None,
            score: None,
            source: None,
            user_id: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.archived && self.status.is_active()
    }
}

/// Addressable fields of a [`Candidature`], keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidatureField {
    Id,
    Company,
    Position,
    Location,
    OfferLink,
    Description,
    ApplicationDate,
    LastContactDate,
    FollowUpDate,
    Status,
    Priority,
    Archived,
    ContactName,
    ContactEmail,
    ContactPhone,
    ContactLinkedin,
    ContactSite,
    ContactChannel,
    ContractType,
    SalaryMin,
    SalaryMax,
    RemunerationType,
    TeleworkType,
    TeleworkDays,
    Score,
    Source,
    UserId,
}

impl CandidatureField {
    pub const ALL: &'static [CandidatureField] = &[
        CandidatureField::Id,
        CandidatureField::Company,
        CandidatureField::Position,
        CandidatureField::Location,
        CandidatureField::OfferLink,
        CandidatureField::Description,
        CandidatureField::ApplicationDate,
        CandidatureField::LastContactDate,
        CandidatureField::FollowUpDate,
        CandidatureField::Status,
        CandidatureField::Priority,
        CandidatureField::Archived,
        CandidatureField::ContactName,
        CandidatureField::ContactEmail,
        CandidatureField::ContactPhone,
        CandidatureField::ContactLinkedin,
        CandidatureField::ContactSite,
        CandidatureField::ContactChannel,
        CandidatureField::ContractType,
        CandidatureField::SalaryMin,
        CandidatureField::SalaryMax,
        CandidatureField::RemunerationType,
        CandidatureField::TeleworkType,
        CandidatureField::TeleworkDays,
        CandidatureField::Score,
        CandidatureField::Source,
        CandidatureField::UserId,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CandidatureField::Id => "id",
            CandidatureField::Company => "entreprise",
            CandidatureField::Position => "poste",
            CandidatureField::Location => "localisation",
            CandidatureField::OfferLink => "lienOffre",
            CandidatureField::Description => "description",
            CandidatureField::ApplicationDate => "dateCandidature",
            CandidatureField::LastContactDate => "dateDernierContact",
            CandidatureField::FollowUpDate => "dateRelancePrevue",
            CandidatureField::Status => "statut",
            CandidatureField::Priority => "priorite",
            CandidatureField::Archived => "archivee",
            CandidatureField::ContactName => "contactNom",
            CandidatureField::ContactEmail => "contactEmail",
            CandidatureField::ContactPhone => "contactTelephone",
            CandidatureField::ContactLinkedin => "contactLinkedin",
            CandidatureField::ContactSite => "contactSite",
            CandidatureField::ContactChannel => "canalContact",
            CandidatureField::ContractType => "typeContrat",
            CandidatureField::SalaryMin => "salaireMin",
            CandidatureField::SalaryMax => "salaireMax",
            CandidatureField::RemunerationType => "typeRemuneration",
            CandidatureField::TeleworkType => "typeTeletravail",
            CandidatureField::TeleworkDays => "joursTeletravailParSemaine",
            CandidatureField::Score => "score",
            CandidatureField::Source => "source",
            CandidatureField::UserId => "userId",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

impl std::str::FromStr for CandidatureField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| Error::BadRequest(format!("Unknown field '{}'", s)))
    }
}

fn text(value: &Option<String>) -> FieldValue {
    value.clone().into()
}

fn code<T: Copy>(value: Option<T>, as_str: fn(&T) -> &'static str) -> FieldValue {
    value
        .map(|v| FieldValue::Text(as_str(&v).to_string()))
        .unwrap_or(FieldValue::Null)
}

impl Record for Candidature {
    type Key = CandidatureField;

    fn field(&self, key: CandidatureField) -> FieldValue {
        match key {
            CandidatureField::Id => FieldValue::Int(self.id),
            CandidatureField::Company => FieldValue::Text(self.company.clone()),
            CandidatureField::Position => FieldValue::Text(self.position.clone()),
            CandidatureField::Location => FieldValue::Text(self.location.clone()),
            CandidatureField::OfferLink => text(&self.offer_link),
            CandidatureField::Description => text(&self.description),
            CandidatureField::ApplicationDate => FieldValue::Date(self.application_date),
            CandidatureField::LastContactDate => self
                .last_contact_date
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Null),
            CandidatureField::FollowUpDate => self
                .follow_up_date
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Null),
            // Status sorts by its wire code.
            CandidatureField::Status => FieldValue::Text(self.status.as_str().to_string()),
            CandidatureField::Priority => code(self.priority, Priority::as_str),
            CandidatureField::Archived => FieldValue::Bool(self.archived),
            CandidatureField::ContactName => text(&self.contact_name),
            CandidatureField::ContactEmail => text(&self.contact_email),
            CandidatureField::ContactPhone => text(&self.contact_phone),
            CandidatureField::ContactLinkedin => text(&self.contact_linkedin),
            CandidatureField::ContactSite => text(&self.contact_site),
            CandidatureField::ContactChannel => code(self.contact_channel, ContactChannel::as_str),
            CandidatureField::ContractType => code(self.contract_type, ContractType::as_str),
            CandidatureField::SalaryMin => self
                .salary_min
                .map(FieldValue::Decimal)
                .unwrap_or(FieldValue::Null),
            CandidatureField::SalaryMax => self
                .salary_max
                .map(FieldValue::Decimal)
                .unwrap_or(FieldValue::Null),
            CandidatureField::RemunerationType => {
                code(self.remuneration_type, RemunerationType::as_str)
            }
            CandidatureField::TeleworkType => code(self.telework_type, TeleworkType::as_str),
            CandidatureField::TeleworkDays => self
                .telework_days_per_week
                .map(|d| FieldValue::Int(d.into()))
                .unwrap_or(FieldValue::Null),
            CandidatureField::Score => self
                .score
                .map(|s| FieldValue::Int(s.into()))
                .unwrap_or(FieldValue::Null),
            CandidatureField::Source => text(&self.source),
            CandidatureField::UserId => FieldValue::Int(self.user_id),
        }
    }
}
