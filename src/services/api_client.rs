use std::time::Duration;

use bytes::Bytes;
use reqwest::{multipart::Form, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;
use crate::dto::auth_dto::MessageResponse;
use crate::error::{ApiError, ApiErrorBody, Error, ErrorKind, Result};
use crate::notifications::Notifications;
use crate::session::SessionStore;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expirée. Veuillez vous reconnecter.";
pub const FORBIDDEN_MESSAGE: &str = "Accès refusé. Vous n'avez pas les permissions nécessaires.";
pub const LOCKOUT_MESSAGE: &str =
    "Compte temporairement bloqué après trop de tentatives. Réessayez dans 15 minutes.";
pub const SERVER_ERROR_MESSAGE: &str = "Erreur serveur. Veuillez réessayer plus tard.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Erreur de connexion. Vérifiez votre connexion internet.";

const MISSING_ENDPOINT_MESSAGE: &str = "Endpoint not found";

/// URL fragments whose 401 responses do not end the session.
const SOFT_AUTH_PATHS: &[&str] = &["/stats/", "/auth/"];

/// HTTP client shared by every service. Attaches the bearer token and
/// turns failed responses into [`Error::Api`] after reacting to them
/// centrally (logout, toasts).
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
    notifications: Notifications,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionStore, notifications: Notifications) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url(&config.api_base_url)?,
            session,
            notifications,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                if !url.path().contains("/auth/") {
                    debug!(url = %url, "No session token for request");
                }
                builder
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let url = self.url(path)?;
        let method_name = method.to_string();
        let request = build(self.request(method, url.clone()));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = if e.is_timeout() {
                    Error::Timeout(url.to_string())
                } else {
                    Error::Reqwest(e)
                };
                self.intercept(&err, url.as_str());
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&raw).unwrap_or_default();
        let err = Error::Api(ApiError::new(status.as_u16(), &method_name, url.as_str(), body));
        self.intercept(&err, url.as_str());
        Err(err)
    }

    /// Central reaction to failed calls. The error is still returned to
    /// the caller afterwards.
    fn intercept(&self, err: &Error, url: &str) {
        match err.kind() {
            ErrorKind::Unauthorized => {
                let soft_path = SOFT_AUTH_PATHS.iter().any(|p| url.contains(p));
                let missing_endpoint = err.server_message() == Some(MISSING_ENDPOINT_MESSAGE);
                if soft_path || missing_endpoint {
                    warn!(url, "Endpoint unavailable for current session");
                } else {
                    warn!(url, "Session rejected by server, logging out");
                    self.session.logout();
                    self.notifications.error(SESSION_EXPIRED_MESSAGE);
                }
            }
            ErrorKind::Forbidden => {
                self.notifications.error(FORBIDDEN_MESSAGE);
            }
            ErrorKind::NotFound => {
                warn!(url, "Resource not found");
            }
            ErrorKind::RateLimited => {
                self.notifications.error(LOCKOUT_MESSAGE);
            }
            ErrorKind::Server if err.status() == 500 => {
                error!(url, "Server error");
                self.notifications.error(SERVER_ERROR_MESSAGE);
            }
            ErrorKind::Network if matches!(err, Error::Reqwest(_)) => {
                error!(url, error = %err, "Backend unreachable");
                self.notifications.error(CONNECTION_ERROR_MESSAGE);
            }
            _ => {
                debug!(url, error = %err, "Request failed");
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let raw = response.bytes().await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r).await?;
        Self::decode(response).await
    }

    /// GET with a per-request deadline.
    pub async fn get_json_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r.timeout(timeout)).await?;
        Self::decode(response).await
    }

    pub async fn get_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r.query(query)).await?;
        Self::decode(response).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let response = self.send(Method::GET, path, |r| r).await?;
        Ok(response.bytes().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, |r| r.json(body)).await?;
        Self::decode(response).await
    }

    /// POST whose response body may be empty or free-form.
    pub async fn post_for_message<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MessageResponse> {
        let response = self.send(Method::POST, path, |r| r.json(body)).await?;
        Ok(lenient_message(&response.bytes().await?))
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::PUT, path, |r| r.json(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::PATCH, path, |r| r.json(body)).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<MessageResponse> {
        let response = self.send(Method::DELETE, path, |r| r).await?;
        Ok(lenient_message(&response.bytes().await?))
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<MessageResponse> {
        let response = self.send(Method::POST, path, |r| r.multipart(form)).await?;
        Ok(lenient_message(&response.bytes().await?))
    }
}

fn base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("API base URL is empty".into()));
    }
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}

fn lenient_message(raw: &[u8]) -> MessageResponse {
    if raw.iter().all(|b| b.is_ascii_whitespace()) {
        return MessageResponse::default();
    }
    serde_json::from_slice(raw).unwrap_or_else(|_| MessageResponse {
        message: Some(String::from_utf8_lossy(raw).into_owned()),
    })
}
