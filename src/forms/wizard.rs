//! Four-step create/edit form for a candidature.
//!
//! Each step validates its own fields. Moving forward is blocked while the
//! current step has errors, and the offending fields are marked touched so
//! their messages become visible.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::candidature_dto::CandidaturePayload;
use crate::error::{Error, Result};
use crate::models::candidature::Candidature;
use crate::models::enums::ApplicationStatus;
use crate::notifications::Notifications;
use crate::services::candidature_service::CandidatureService;
use crate::utils::time;
use crate::utils::validation::{
    check_length, check_range, date_not_before, salary_range, validate_email, validate_phone,
    validate_url, COMPANY_LIMIT, LOCATION_LIMIT, POSITION_LIMIT, SOURCE_LIMIT,
};

pub const INCOMPLETE_FORM_MESSAGE: &str = "Veuillez remplir tous les champs obligatoires";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    General = 1,
    FollowUp = 2,
    Contact = 3,
    Terms = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::General,
        WizardStep::FollowUp,
        WizardStep::Contact,
        WizardStep::Terms,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::General => "Informations générales",
            WizardStep::FollowUp => "Suivi",
            WizardStep::Contact => "Contact",
            WizardStep::Terms => "Conditions",
        }
    }

    /// Wire names of the fields checked on this step.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            WizardStep::General => &["entreprise", "poste", "localisation"],
            WizardStep::FollowUp => &["dateCandidature", "statut", "dateDernierContact"],
            WizardStep::Contact => &["contactEmail", "contactTelephone", "contactLinkedin", "contactSite"],
            WizardStep::Terms => &["salaireMin", "salaireMax", "score", "joursTeletravailParSemaine", "source"],
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit(i64),
}

impl WizardMode {
    pub fn success_message(self) -> &'static str {
        match self {
            WizardMode::Create => "Candidature ajoutée avec succès",
            WizardMode::Edit(_) => "Candidature modifiée avec succès",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            WizardMode::Create => "Erreur lors de l'ajout de la candidature",
            WizardMode::Edit(_) => "Erreur lors de la modification de la candidature",
        }
    }
}

pub type StepErrors = BTreeMap<&'static str, ValidationError>;

pub struct CandidatureWizard {
    draft: CandidaturePayload,
    mode: WizardMode,
    step: WizardStep,
    touched: BTreeSet<&'static str>,
}

impl CandidatureWizard {
    /// Empty form dated today with status "Postulée".
    pub fn create() -> Self {
        Self::create_on(time::today())
    }

    pub fn create_on(today: NaiveDate) -> Self {
        Self {
            draft: CandidaturePayload::new("", "", today, ApplicationStatus::Applied),
            mode: WizardMode::Create,
            step: WizardStep::General,
            touched: BTreeSet::new(),
        }
    }

    /// Form prefilled from an existing record.
    pub fn edit(candidature: &Candidature) -> Self {
        Self {
            draft: CandidaturePayload::from(candidature),
            mode: WizardMode::Edit(candidature.id),
            step: WizardStep::General,
            touched: BTreeSet::new(),
        }
    }

    pub fn draft(&self) -> &CandidaturePayload {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CandidaturePayload {
        &mut self.draft
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        WizardStep::ALL.len()
    }

    pub fn is_first_step(&self) -> bool {
        self.step == WizardStep::General
    }

    pub fn is_last_step(&self) -> bool {
        self.step == WizardStep::Terms
    }

    pub fn step_errors(&self, step: WizardStep) -> StepErrors {
        let d = &self.draft;
        let mut errors = StepErrors::new();
        let mut check = |field: &'static str, result: std::result::Result<(), ValidationError>| {
            if let Err(e) = result {
                errors.entry(field).or_insert(e);
            }
        };

        match step {
            WizardStep::General => {
                check("entreprise", check_length(&d.company, COMPANY_LIMIT));
                check("poste", check_length(&d.position, POSITION_LIMIT));
                check("localisation", check_length(&d.location, LOCATION_LIMIT));
            }
            WizardStep::FollowUp => {
                if let Some(last_contact) = d.last_contact_date {
                    check("dateDernierContact", date_not_before(d.application_date, last_contact));
                }
            }
            WizardStep::Contact => {
                if let Some(email) = &d.contact_email {
                    check("contactEmail", validate_email(email));
                }
                if let Some(phone) = &d.contact_phone {
                    check("contactTelephone", validate_phone(phone));
                }
                if let Some(linkedin) = &d.contact_linkedin {
                    check("contactLinkedin", validate_url(linkedin));
                }
                if let Some(site) = &d.contact_site {
                    check("contactSite", validate_url(site));
                }
            }
            WizardStep::Terms => {
                check("salaireMin", salary_range(d.salary_min, None));
                let valid_min = d.salary_min.filter(|m| !m.is_sign_negative());
                check(
                    "salaireMax",
                    salary_range(None, d.salary_max).and_then(|()| salary_range(valid_min, d.salary_max)),
                );
                if let Some(score) = d.score {
                    check("score", check_range(score, 1, 5));
                }
                if let Some(days) = d.telework_days_per_week {
                    check("joursTeletravailParSemaine", check_range(days, 1, 5));
                }
                if let Some(source) = &d.source {
                    check("source", check_length(source, SOURCE_LIMIT));
                }
            }
        }
        errors
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        self.step_errors(step).is_empty()
    }

    pub fn can_go_next(&self) -> bool {
        self.is_step_valid(self.step)
    }

    pub fn is_valid(&self) -> bool {
        WizardStep::ALL.iter().all(|s| self.is_step_valid(*s))
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    fn touch_step(&mut self, step: WizardStep) {
        self.touched.extend(step.fields().iter().copied());
    }

    /// Error to display for a field: only once it has been touched.
    pub fn visible_error(&self, field: &str) -> Option<ValidationError> {
        if !self.is_touched(field) {
            return None;
        }
        WizardStep::ALL
            .iter()
            .find_map(|s| self.step_errors(*s).remove(field))
    }

    /// Advances when the current step is valid; otherwise marks its fields
    /// touched and stays.
    pub fn next_step(&mut self) -> bool {
        if !self.can_go_next() {
            self.touch_step(self.step);
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Jumps to `target`, stopping at the first invalid step before it.
    pub fn go_to_step(&mut self, target: u8) -> WizardStep {
        let Some(target) = WizardStep::from_number(target) else {
            return self.step;
        };
        for step in WizardStep::ALL.into_iter().filter(|s| *s < target) {
            if !self.is_step_valid(step) {
                self.step = step;
                self.touch_step(step);
                return step;
            }
        }
        self.step = target;
        target
    }

    /// Normalized payload, or every error when some step is invalid. All
    /// fields are marked touched on failure.
    pub fn build_payload(&mut self) -> Result<CandidaturePayload> {
        let mut errors = ValidationErrors::new();
        for step in WizardStep::ALL {
            for (field, err) in self.step_errors(step) {
                errors.add(field, err);
            }
        }
        if !errors.is_empty() {
            for step in WizardStep::ALL {
                self.touch_step(step);
            }
            return Err(Error::Validation(errors));
        }

        let payload = normalize(self.draft.clone());
        payload.validate()?;
        Ok(payload)
    }

    /// Validates, sends a create or update and reports the outcome as a
    /// toast.
    pub async fn submit(
        &mut self,
        service: &CandidatureService,
        notifications: &Notifications,
    ) -> Result<Candidature> {
        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(e) => {
                notifications.warning(INCOMPLETE_FORM_MESSAGE);
                return Err(e);
            }
        };

        let result = match self.mode {
            WizardMode::Create => service.create(&payload).await,
            WizardMode::Edit(id) => service.update(id, &payload).await,
        };
        match result {
            Ok(saved) => {
                info!(id = saved.id, "Candidature saved from wizard");
                notifications.success(self.mode.success_message());
                if self.mode == WizardMode::Create {
                    self.mode = WizardMode::Edit(saved.id);
                }
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "Wizard submission failed");
                notifications.error(self.mode.failure_message());
                Err(e)
            }
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize(mut p: CandidaturePayload) -> CandidaturePayload {
    p.company = p.company.trim().to_string();
    p.position = p.position.trim().to_string();
    p.location = p.location.trim().to_string();
    p.offer_link = blank_to_none(p.offer_link);
    p.description = blank_to_none(p.description);
    p.contact_name = blank_to_none(p.contact_name);
    p.contact_email = blank_to_none(p.contact_email);
    p.contact_phone = blank_to_none(p.contact_phone);
    p.contact_linkedin = blank_to_none(p.contact_linkedin);
    p.contact_site = blank_to_none(p.contact_site);
    p.source = blank_to_none(p.source);
    p
}
