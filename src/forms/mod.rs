//! Form state for the candidature wizard and the authentication screens.

pub mod auth;
pub mod wizard;

pub use auth::{ForgotPasswordForm, LoginForm, OtpStatus, RegisterForm, ResetPasswordForm};
pub use wizard::{CandidatureWizard, WizardMode, WizardStep};
