use tracing::{info, instrument};
use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, OtpVerification,
    RegisterRequest, ResetPasswordOtpRequest, ResetPasswordRequest, VerifyOtpQuery,
};
use crate::error::{Error, ErrorKind, Result};
use crate::models::user::User;
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.api.session().current_user()
    }

    pub fn token(&self) -> Option<String> {
        self.api.session().token()
    }

    /// Authenticates and stores the session.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        credentials.validate()?;
        let response: AuthResponse = self.api.post_json("auth/login", credentials).await?;
        self.api.session().authenticate(&response)?;
        info!(user_id = response.user.id, "Logged in");
        Ok(response)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;
        let response: AuthResponse = self.api.post_json("auth/register", request).await?;
        self.api.session().authenticate(&response)?;
        info!(user_id = response.user.id, "Account created");
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let request = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        self.api.post_for_message("auth/forgot-password", &request).await
    }

    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<MessageResponse> {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        request.validate()?;
        self.api.post_for_message("auth/reset-password", &request).await
    }

    #[instrument(skip(self, otp_code, new_password))]
    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        otp_code: &str,
        new_password: &str,
    ) -> Result<MessageResponse> {
        let request = ResetPasswordOtpRequest {
            email: email.trim().to_string(),
            otp_code: otp_code.trim().to_string(),
            new_password: new_password.to_string(),
        };
        request.validate()?;
        self.api.post_for_message("auth/reset-password-otp", &request).await
    }

    #[instrument(skip(self, otp_code))]
    pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<OtpVerification> {
        let query = VerifyOtpQuery {
            email: email.trim().to_string(),
            otp_code: otp_code.trim().to_string(),
        };
        query.validate()?;
        self.api.get_query("auth/verify-otp", &query).await
    }

    pub fn logout(&self) {
        self.api.session().logout();
    }
}

/// Message shown for a failed authentication call.
pub fn error_message(err: &Error) -> String {
    if let Error::Validation(_) = err {
        return "Veuillez remplir correctement tous les champs".to_string();
    }
    let server = err.server_message().map(str::to_string);
    match (err.kind(), err.status()) {
        (_, 400) | (_, 401) => server.unwrap_or_else(|| "Email ou mot de passe incorrect".into()),
        (_, 409) => server.unwrap_or_else(|| "L'email est déjà utilisé".into()),
        (ErrorKind::Network, _) => "Impossible de contacter le serveur".to_string(),
        _ => "Une erreur est survenue".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ApiErrorBody};

    fn api_error(status: u16, message: Option<&str>) -> Error {
        Error::Api(ApiError::new(
            status,
            "POST",
            "http://localhost/api/auth/login",
            ApiErrorBody {
                message: message.map(str::to_string),
                ..Default::default()
            },
        ))
    }

    #[test]
    fn credentials_errors_prefer_server_text() {
        assert_eq!(error_message(&api_error(401, None)), "Email ou mot de passe incorrect");
        assert_eq!(error_message(&api_error(400, Some("Compte inconnu"))), "Compte inconnu");
    }

    #[test]
    fn conflict_and_generic_messages() {
        assert_eq!(error_message(&api_error(409, None)), "L'email est déjà utilisé");
        assert_eq!(error_message(&api_error(500, None)), "Une erreur est survenue");
        assert_eq!(
            error_message(&Error::Timeout("http://x".into())),
            "Impossible de contacter le serveur"
        );
    }
}
