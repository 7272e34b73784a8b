use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;
use crate::utils::validation::validate_otp_code;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nom")]
    #[validate(length(min = 2, max = 50))]
    pub last_name: String,
    #[serde(rename = "prenom")]
    #[validate(length(min = 2, max = 50))]
    pub first_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Link-based reset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
}

/// Code-based reset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_otp_code"))]
    pub otp_code: String,
    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpQuery {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_otp_code"))]
    pub otp_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerification {
    pub valid: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_email_and_six_chars() {
        let ok = LoginRequest {
            email: "jean@example.com".into(),
            password: "secret".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "jean".into(),
            password: "123".into(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn register_serializes_french_names() {
        let req = RegisterRequest {
            last_name: "Dupont".into(),
            first_name: "Jean".into(),
            email: "jean@example.com".into(),
            password: "secret1".into(),
        };
        assert!(req.validate().is_ok());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["nom"], "Dupont");
        assert_eq!(value["prenom"], "Jean");
    }

    #[test]
    fn otp_reset_checks_code_shape() {
        let req = ResetPasswordOtpRequest {
            email: "jean@example.com".into(),
            otp_code: "12a456".into(),
            new_password: "longenough".into(),
        };
        assert!(req.validate().is_err());

        let req = ResetPasswordOtpRequest {
            otp_code: "123456".into(),
            ..req
        };
        assert!(req.validate().is_ok());
        assert_eq!(serde_json::to_value(&req).unwrap()["otpCode"], "123456");
    }
}
