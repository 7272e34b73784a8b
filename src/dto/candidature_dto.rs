use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::candidature::Candidature;
use crate::models::enums::{
    ApplicationStatus, ContactChannel, ContractType, Priority, RemunerationType, TeleworkType,
};
use crate::utils::time::{lenient_date, lenient_date_opt};
use crate::utils::validation::{date_not_before, salary_range};

/// Body of create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_consistency"))]
pub struct CandidaturePayload {
    #[serde(rename = "entreprise")]
    #[validate(length(min = 1, max = 100))]
    pub company: String,
    #[serde(rename = "poste")]
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[serde(rename = "localisation")]
    #[validate(length(max = 100))]
    pub location: String,
    #[serde(rename = "lienOffre", skip_serializing_if = "Option::is_none", default)]
    pub offer_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "dateCandidature", with = "lenient_date")]
    pub application_date: NaiveDate,
    #[serde(
        rename = "dateDernierContact",
        with = "lenient_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub last_contact_date: Option<NaiveDate>,
    #[serde(
        rename = "dateRelancePrevue",
        with = "lenient_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(rename = "statut")]
    pub status: ApplicationStatus,
    #[serde(rename = "priorite", skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<Priority>,
    #[serde(rename = "archivee", default)]
    pub archived: bool,
    #[serde(rename = "contactNom", skip_serializing_if = "Option::is_none", default)]
    pub contact_name: Option<String>,
    #[serde(rename = "contactEmail", skip_serializing_if = "Option::is_none", default)]
    #[validate(email)]
    pub contact_email: Option<String>,
    #[serde(rename = "contactTelephone", skip_serializing_if = "Option::is_none", default)]
    pub contact_phone: Option<String>,
    #[serde(rename = "contactLinkedin", skip_serializing_if = "Option::is_none", default)]
    pub contact_linkedin: Option<String>,
    #[serde(rename = "contactSite", skip_serializing_if = "Option::is_none", default)]
    pub contact_site: Option<String>,
    #[serde(rename = "canalContact", skip_serializing_if = "Option::is_none", default)]
    pub contact_channel: Option<ContactChannel>,
    #[serde(rename = "typeContrat", skip_serializing_if = "Option::is_none", default)]
    pub contract_type: Option<ContractType>,
    #[serde(
        rename = "salaireMin",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub salary_min: Option<Decimal>,
    #[serde(
        rename = "salaireMax",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub salary_max: Option<Decimal>,
    #[serde(rename = "typeRemuneration", skip_serializing_if = "Option::is_none", default)]
    pub remuneration_type: Option<RemunerationType>,
    #[serde(rename = "typeTeletravail", skip_serializing_if = "Option::is_none", default)]
    pub telework_type: Option<TeleworkType>,
    #[serde(
        rename = "joursTeletravailParSemaine",
        skip_serializing_if = "Option::is_none",
        default
    )]
    #[validate(range(min = 1, max = 5))]
    pub telework_days_per_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[validate(range(min = 1, max = 5))]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[validate(length(max = 200))]
    pub source: Option<String>,
}

fn validate_consistency(payload: &CandidaturePayload) -> Result<(), ValidationError> {
    salary_range(payload.salary_min, payload.salary_max)?;
    if let Some(last_contact) = payload.last_contact_date {
        date_not_before(payload.application_date, last_contact)?;
    }
    Ok(())
}

impl From<&Candidature> for CandidaturePayload {
    fn from(c: &Candidature) -> Self {
        Self {
            company: c.company.clone(),
            position: c.position.clone(),
            location: c.location.clone(),
            offer_link: c.offer_link.clone(),
            description: c.description.clone(),
            application_date: c.application_date,
            last_contact_date: c.last_contact_date,
            follow_up_date: c.follow_up_date,
            status: c.status,
            priority: c.priority,
            archived: c.archived,
            contact_name: c.contact_name.clone(),
            contact_email: c.contact_email.clone(),
            contact_phone: c.contact_phone.clone(),
            contact_linkedin: c.contact_linkedin.clone(),
            contact_site: c.contact_site.clone(),
            contact_channel: c.contact_channel,
            contract_type: c.contract_type,
            salary_min: c.salary_min,
            salary_max: c.salary_max,
            remuneration_type: c.remuneration_type,
            telework_type: c.telework_type,
            telework_days_per_week: c.telework_days_per_week,
            score: c.score,
            source: c.source.clone(),
        }
    }
}

impl CandidaturePayload {
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        application_date: NaiveDate,
        status: ApplicationStatus,
    ) -> Self {
        Self::from(&Candidature::new(0, company, position, application_date, status))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdatePayload {
    #[serde(rename = "statut")]
    pub status: ApplicationStatus,
}
