mod common;

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use job_tracker::error::Error;
use job_tracker::forms::{ForgotPasswordForm, LoginForm, OtpStatus, ResetPasswordForm};
use job_tracker::notifications::ToastKind;
use job_tracker::services::user_data_service::EMPTY_EXPORT_MESSAGE;
use serde::Deserialize;
use serde_json::{json, Value};

use common::{auth_response, client, spawn, Recorder};

#[derive(Clone, Default)]
struct Uploads {
    files: Arc<Mutex<Vec<(String, String, Vec<u8>)>>>,
}

async fn import(State(uploads): State<Uploads>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap().to_vec();
        uploads.files.lock().unwrap().push((name, file_name, bytes));
    }
    Json(json!({ "message": "Import terminé" }))
}

fn data_backend(uploads: Uploads) -> Router {
    Router::new()
        .route(
            "/api/user/export",
            get(|| async { Json(json!({ "candidatures": [{ "entreprise": "Acme" }] })) }),
        )
        .route("/api/user/import", post(import))
        .route("/api/user/delete", delete(|| async { StatusCode::NO_CONTENT }))
        .with_state(uploads)
}

#[tokio::test]
async fn export_import_and_delete_account() {
    let uploads = Uploads::default();
    let base = spawn(data_backend(uploads.clone())).await;
    let state = client(&base);
    state
        .session
        .authenticate(&serde_json::from_value(auth_response()).unwrap())
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    let written = state.user_data.export_to(&path).await.unwrap();
    assert!(written > 0);

    let response = state.user_data.import_file(&path).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("Import terminé"));
    {
        let files = uploads.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "file");
        assert_eq!(files[0].1, "export.json");
        let sent: Value = serde_json::from_slice(&files[0].2).unwrap();
        assert_eq!(sent["candidatures"][0]["entreprise"], "Acme");
    }

    state.user_data.delete_account().await.unwrap();
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
async fn empty_export_is_rejected() {
    let router = Router::new().route("/api/user/export", get(|| async { "" }));
    let base = spawn(router).await;
    let state = client(&base);

    let err = state.user_data.export().await.unwrap_err();
    assert!(matches!(err, Error::BadRequest(ref m) if m == EMPTY_EXPORT_MESSAGE));
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OtpQuery {
    email: String,
    otp_code: String,
}

async fn verify_otp(Query(q): Query<OtpQuery>) -> Json<Value> {
    let body = match q.otp_code.as_str() {
        "123456" => json!({ "valid": true, "expired": false }),
        "000000" => json!({ "valid": false, "expired": true }),
        _ => json!({ "valid": false, "message": format!("Code incorrect pour {}", q.email) }),
    };
    Json(body)
}

fn auth_backend(recorder: Recorder) -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret1" {
                    (StatusCode::OK, Json(auth_response()))
                } else {
                    (StatusCode::BAD_REQUEST, Json(json!({})))
                }
            }),
        )
        .route(
            "/api/auth/forgot-password",
            post(|| async { StatusCode::OK }),
        )
        .route("/api/auth/verify-otp", get(verify_otp))
        .route(
            "/api/auth/reset-password-otp",
            post(|State(recorder): State<Recorder>, Json(body): Json<Value>| async move {
                recorder.bodies.lock().unwrap().push(body);
                Json(json!({ "message": "ok" }))
            }),
        )
        .with_state(recorder)
}

#[tokio::test]
async fn login_form_reports_outcome_as_toasts() {
    let base = spawn(auth_backend(Recorder::default())).await;
    let state = client(&base);

    let mut form = LoginForm {
        email: "jean@example.com".into(),
        password: "badpass".into(),
    };
    form.submit(&state.auth, &state.notifications).await.unwrap_err();
    assert_eq!(
        state.notifications.messages(ToastKind::Error),
        vec!["Email ou mot de passe incorrect".to_string()]
    );

    form.password = "secret1".into();
    form.submit(&state.auth, &state.notifications).await.unwrap();
    assert!(state.auth.is_authenticated());
    assert_eq!(
        state.notifications.messages(ToastKind::Success),
        vec!["Connexion réussie ! Bienvenue".to_string()]
    );
}

#[tokio::test]
async fn forgot_then_reset_with_otp() {
    let recorder = Recorder::default();
    let base = spawn(auth_backend(recorder.clone())).await;
    let state = client(&base);

    let mut forgot = ForgotPasswordForm::new("jean@example.com");
    forgot.submit(&state.auth, &state.notifications).await.unwrap();
    assert!(forgot.is_sent());

    let mut reset = ResetPasswordForm::new("jean@example.com");
    reset.new_password = "nouveau-mdp".into();
    reset.confirm_password = "nouveau-mdp".into();
    reset.submit(&state.auth, &state.notifications).await.unwrap_err();
    assert!(recorder.bodies().is_empty());

    reset.set_otp_code("111111");
    let status = reset.verify(&state.auth, &state.notifications).await.clone();
    assert_eq!(
        status,
        OtpStatus::Invalid("Code incorrect pour jean@example.com".into())
    );

    reset.set_otp_code("000000");
    assert_eq!(reset.verify(&state.auth, &state.notifications).await, &OtpStatus::Expired);
    assert!(!reset.password_fields_enabled());

    reset.set_otp_code("123456");
    assert_eq!(reset.verify(&state.auth, &state.notifications).await, &OtpStatus::Valid);
    reset.submit(&state.auth, &state.notifications).await.unwrap();
    assert!(reset.is_done());

    let bodies = recorder.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["otpCode"], "123456");
    assert_eq!(bodies[0]["newPassword"], "nouveau-mdp");
    assert!(state
        .notifications
        .messages(ToastKind::Success)
        .contains(&"Votre mot de passe a été réinitialisé avec succès.".to_string()));
}
