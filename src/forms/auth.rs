use std::collections::BTreeMap;

use tracing::{info, warn};
use validator::ValidationError;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{Error, Result};
use crate::notifications::Notifications;
use crate::services::auth_service::{self, AuthService};
use crate::utils::validation::{
    check_length, passwords_match, validate_email, validate_otp_code, FieldLimit, NAME_LIMIT,
};

pub const INVALID_FIELDS_MESSAGE: &str = "Veuillez remplir correctement tous les champs";

const LOGIN_PASSWORD_LIMIT: FieldLimit = FieldLimit { min: Some(6), max: 100 };
const RESET_PASSWORD_LIMIT: FieldLimit = FieldLimit { min: Some(8), max: 100 };

pub type FieldErrors = BTreeMap<&'static str, ValidationError>;

fn required(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Ce champ est requis".into());
        Err(err)
    } else {
        Ok(())
    }
}

fn collect(checks: Vec<(&'static str, std::result::Result<(), ValidationError>)>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, result) in checks {
        if let Err(e) = result {
            errors.entry(field).or_insert(e);
        }
    }
    errors
}

fn email_checks(email: &str) -> std::result::Result<(), ValidationError> {
    required(email).and_then(|()| validate_email(email))
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn errors(&self) -> FieldErrors {
        collect(vec![
            ("email", email_checks(&self.email)),
            ("password", check_length(&self.password, LOGIN_PASSWORD_LIMIT)),
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub async fn submit(&self, auth: &AuthService, notifications: &Notifications) -> Result<AuthResponse> {
        if !self.is_valid() {
            notifications.warning(INVALID_FIELDS_MESSAGE);
            return Err(Error::BadRequest(INVALID_FIELDS_MESSAGE.into()));
        }
        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        match auth.login(&request).await {
            Ok(response) => {
                notifications.success("Connexion réussie ! Bienvenue");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                notifications.error(auth_service::error_message(&e));
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn errors(&self) -> FieldErrors {
        collect(vec![
            ("nom", check_length(&self.last_name, NAME_LIMIT)),
            ("prenom", check_length(&self.first_name, NAME_LIMIT)),
            ("email", email_checks(&self.email)),
            ("password", check_length(&self.password, LOGIN_PASSWORD_LIMIT)),
            ("confirmPassword", passwords_match(&self.password, &self.confirm_password)),
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub async fn submit(&self, auth: &AuthService, notifications: &Notifications) -> Result<AuthResponse> {
        if !self.is_valid() {
            notifications.warning(INVALID_FIELDS_MESSAGE);
            return Err(Error::BadRequest(INVALID_FIELDS_MESSAGE.into()));
        }
        let request = RegisterRequest {
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        match auth.register(&request).await {
            Ok(response) => {
                notifications.success("Inscription réussie ! Bienvenue 🎉");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                notifications.error(auth_service::error_message(&e));
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
    sent: bool,
}

impl ForgotPasswordForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            sent: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        email_checks(&self.email).is_ok()
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Request a reset code. The confirmation does not reveal whether the
    /// address is known.
    pub async fn submit(&mut self, auth: &AuthService, notifications: &Notifications) -> Result<()> {
        if !self.is_valid() {
            notifications.warning(INVALID_FIELDS_MESSAGE);
            return Err(Error::BadRequest(INVALID_FIELDS_MESSAGE.into()));
        }
        match auth.forgot_password(&self.email).await {
            Ok(_) => {
                self.sent = true;
                notifications.success("Un email de réinitialisation a été envoyé si l’adresse existe.");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Password reset request failed");
                notifications.error("Erreur lors de la demande de réinitialisation.");
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OtpStatus {
    #[default]
    Pending,
    Valid,
    Invalid(String),
    Expired,
}

impl OtpStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            OtpStatus::Pending => None,
            OtpStatus::Valid => Some("Code OTP valide."),
            OtpStatus::Invalid(message) => Some(message),
            OtpStatus::Expired => Some("Code OTP expiré."),
        }
    }
}

/// Two-phase reset: verify the emailed code, then choose a new password.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    email: String,
    otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
    otp_status: OtpStatus,
    done: bool,
}

impl ResetPasswordForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn otp_code(&self) -> &str {
        &self.otp_code
    }

    pub fn otp_status(&self) -> &OtpStatus {
        &self.otp_status
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Changing the email or code invalidates a previous verification.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.otp_status = OtpStatus::Pending;
    }

    pub fn set_otp_code(&mut self, code: impl Into<String>) {
        self.otp_code = code.into();
        self.otp_status = OtpStatus::Pending;
    }

    pub fn password_fields_enabled(&self) -> bool {
        self.otp_status == OtpStatus::Valid
    }

    pub fn otp_errors(&self) -> FieldErrors {
        collect(vec![
            ("email", email_checks(&self.email)),
            ("otpCode", validate_otp_code(self.otp_code.trim())),
        ])
    }

    pub fn password_errors(&self) -> FieldErrors {
        collect(vec![
            ("newPassword", check_length(&self.new_password, RESET_PASSWORD_LIMIT)),
            ("confirmPassword", passwords_match(&self.new_password, &self.confirm_password)),
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.otp_errors().is_empty() && self.password_errors().is_empty()
    }

    pub async fn verify(&mut self, auth: &AuthService, notifications: &Notifications) -> &OtpStatus {
        if !self.otp_errors().is_empty() {
            notifications.warning("Veuillez saisir un code valide.");
            return &self.otp_status;
        }
        self.otp_status = match auth.verify_otp(&self.email, &self.otp_code).await {
            Ok(result) if result.valid => OtpStatus::Valid,
            Ok(result) if result.expired => OtpStatus::Expired,
            Ok(result) => OtpStatus::Invalid(
                result
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Code OTP invalide.".to_string()),
            ),
            Err(e) => {
                warn!(error = %e, "OTP verification failed");
                notifications.error("Erreur lors de la vérification.");
                OtpStatus::Invalid("Erreur lors de la vérification.".to_string())
            }
        };
        match &self.otp_status {
            OtpStatus::Valid => {
                notifications.success("Code OTP valide.");
            }
            OtpStatus::Expired => {
                notifications.warning("Code OTP expiré.");
            }
            _ => {}
        }
        &self.otp_status
    }

    pub async fn submit(&mut self, auth: &AuthService, notifications: &Notifications) -> Result<()> {
        if !self.password_fields_enabled() {
            notifications.warning("Veuillez vérifier le code OTP.");
            return Err(Error::BadRequest("Veuillez vérifier le code OTP.".into()));
        }
        if !self.is_valid() {
            notifications.warning("Formulaire invalide.");
            return Err(Error::BadRequest("Formulaire invalide.".into()));
        }
        match auth
            .reset_password_with_otp(&self.email, &self.otp_code, &self.new_password)
            .await
        {
            Ok(_) => {
                info!("Password reset with OTP");
                self.done = true;
                notifications.success("Votre mot de passe a été réinitialisé avec succès.");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Password reset failed");
                notifications.error("Erreur lors de la réinitialisation.");
                Err(e)
            }
        }
    }
}
