use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::ApplicationStatus;
use crate::utils::stats::conversion_rate;
use crate::utils::time::lenient_date;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(rename = "totalCandidatures")]
    pub total: u64,
    #[serde(rename = "enCours")]
    pub in_progress: u64,
    #[serde(rename = "acceptees")]
    pub accepted: u64,
    #[serde(rename = "refusees")]
    pub rejected: u64,
    #[serde(rename = "entretiens")]
    pub interviews: u64,
    #[serde(rename = "enAttente")]
    pub pending: u64,
}

impl GlobalStats {
    /// Share of applications that reached an interview, in percent.
    pub fn interview_rate(&self) -> u32 {
        conversion_rate(self.interviews, self.total)
    }

    pub fn acceptance_rate(&self) -> u32 {
        conversion_rate(self.accepted, self.total)
    }

    pub fn rejection_rate(&self) -> u32 {
        conversion_rate(self.rejected, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    #[serde(rename = "mois")]
    pub month: String,
    pub total: u64,
    #[serde(rename = "acceptees", default)]
    pub accepted: u64,
    #[serde(rename = "refusees", default)]
    pub rejected: u64,
}

/// Short reference to an application, as listed in a day's tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatureSummary {
    pub id: i64,
    #[serde(rename = "entreprise")]
    pub company: String,
    #[serde(rename = "poste")]
    pub position: String,
    #[serde(rename = "statut")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(rename = "jour", with = "lenient_date")]
    pub day: NaiveDate,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "appliquees", default)]
    pub applied: u64,
    #[serde(rename = "entretiensTelephoniques", default)]
    pub phone_interviews: u64,
    #[serde(rename = "entretiensTechniques", default)]
    pub technical_interviews: u64,
    #[serde(rename = "entretiensRH", default)]
    pub hr_interviews: u64,
    #[serde(rename = "offres", default)]
    pub offers: u64,
    #[serde(rename = "refusees", default)]
    pub rejected: u64,
    #[serde(rename = "sansReponse", default)]
    pub no_response: u64,
    #[serde(default)]
    pub candidatures: Vec<CandidatureSummary>,
}

impl DailyStats {
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            total: 0,
            applied: 0,
            phone_interviews: 0,
            technical_interviews: 0,
            hr_interviews: 0,
            offers: 0,
            rejected: 0,
            no_response: 0,
            candidatures: Vec::new(),
        }
    }

    pub fn count_for(&self, status: ApplicationStatus) -> u64 {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::PhoneInterview => self.phone_interviews,
            ApplicationStatus::TechnicalInterview => self.technical_interviews,
            ApplicationStatus::HrInterview => self.hr_interviews,
            ApplicationStatus::Offer => self.offers,
            ApplicationStatus::Rejected => self.rejected,
            ApplicationStatus::NoResponse => self.no_response,
        }
    }
}
