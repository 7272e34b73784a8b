use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::error::Error;

/// Status → message table.
pub type HttpErrorMessages = &'static [(u16, &'static str)];

pub const FALLBACK_MESSAGE: &str = "Une erreur est survenue. Veuillez réessayer.";

pub const DEFAULT_ERROR_MESSAGES: HttpErrorMessages = &[
    (400, "Requête invalide. Veuillez vérifier les données saisies."),
    (401, "Non autorisé. Veuillez vous connecter."),
    (403, "Accès refusé. Vous n'avez pas les permissions nécessaires."),
    (404, "Ressource non trouvée."),
    (409, "Conflit. Cette ressource existe déjà."),
    (422, "Données invalides. Veuillez vérifier votre saisie."),
    (500, "Erreur serveur. Veuillez réessayer plus tard."),
    (502, "Service temporairement indisponible."),
    (503, "Service en maintenance."),
    (0, "Impossible de joindre le serveur. Vérifiez votre connexion."),
];

pub const CANDIDATURE_ERROR_MESSAGES: HttpErrorMessages = &[
    (401, "Cette candidature ne vous appartient pas ou votre session a expiré."),
    (404, "Candidature non trouvée."),
    (403, "Accès refusé à cette candidature."),
    (409, "Une candidature similaire existe déjà."),
];

pub const AUTH_ERROR_MESSAGES: HttpErrorMessages = &[
    (400, "Email ou mot de passe incorrect."),
    (401, "Identifiants invalides."),
    (409, "Cet email est déjà utilisé."),
    (422, "Données d'inscription invalides."),
];

pub const STATS_ERROR_MESSAGES: HttpErrorMessages = &[
    (404, "Aucune statistique disponible."),
    (500, "Impossible de charger les statistiques."),
];

fn lookup(table: HttpErrorMessages, status: u16) -> Option<&'static str> {
    table.iter().find(|(code, _)| *code == status).map(|(_, msg)| *msg)
}

/// Resolution order: server-supplied message, context table, default
/// table, generic fallback.
pub fn http_error_message(
    status: u16,
    server_message: Option<&str>,
    custom: Option<HttpErrorMessages>,
) -> String {
    if let Some(msg) = server_message.filter(|m| !m.trim().is_empty()) {
        return msg.to_string();
    }
    custom
        .and_then(|table| lookup(table, status))
        .or_else(|| lookup(DEFAULT_ERROR_MESSAGES, status))
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpErrorInfo {
    pub message: String,
    pub status: u16,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Logs the failure with its context and returns the user-facing summary.
pub fn handle_http_error(err: &Error, context: Option<&str>, custom: Option<HttpErrorMessages>) -> HttpErrorInfo {
    let status = err.status();
    let message = err.user_message(custom);

    error!(
        context = context.unwrap_or("HTTP"),
        status,
        error = %err,
        "Request failed"
    );

    HttpErrorInfo {
        message,
        status,
        details: Some(err.to_string()),
        timestamp: Utc::now(),
    }
}

pub fn is_auth_error(status: u16) -> bool {
    matches!(status, 401 | 403)
}

pub fn is_network_error(status: u16) -> bool {
    matches!(status, 0 | 502 | 503)
}

pub fn is_validation_error(status: u16) -> bool {
    matches!(status, 400 | 422)
}
