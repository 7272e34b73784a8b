mod common;

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use job_tracker::forms::{CandidatureWizard, WizardMode};
use job_tracker::models::enums::ApplicationStatus;
use job_tracker::notifications::ToastKind;
use job_tracker::view::SortIndicator;
use serde_json::{json, Value};

use common::{auth_response, client, sample_candidatures, spawn};

type Db = Arc<Mutex<Vec<Value>>>;

async fn list(State(db): State<Db>) -> Json<Value> {
    Json(Value::Array(db.lock().unwrap().clone()))
}

async fn create(State(db): State<Db>, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut items = db.lock().unwrap();
    body["id"] = json!(100 + items.len() as i64);
    items.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut items = db.lock().unwrap();
    match items.iter_mut().find(|c| c["id"] == json!(id)) {
        Some(existing) => {
            body["id"] = json!(id);
            *existing = body.clone();
            (StatusCode::OK, Json(body))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Candidature introuvable" }))),
    }
}

async fn remove(State(db): State<Db>, Path(id): Path<i64>) -> StatusCode {
    db.lock().unwrap().retain(|c| c["id"] != json!(id));
    StatusCode::NO_CONTENT
}

async fn set_status(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut items = db.lock().unwrap();
    match items.iter_mut().find(|c| c["id"] == json!(id)) {
        Some(existing) => {
            existing["statut"] = body["statut"].clone();
            (StatusCode::OK, Json(existing.clone()))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn backend() -> (String, Db) {
    let db: Db = Arc::new(Mutex::new(sample_candidatures()));
    let router = Router::new()
        .route("/api/candidatures", get(list).post(create))
        .route("/api/candidatures/:id", get(|| async { StatusCode::NOT_FOUND }).put(update).delete(remove))
        .route("/api/candidatures/:id/statut", patch(set_status))
        .with_state(db.clone());
    (spawn(router).await, db)
}

fn signed_in(base: &str) -> job_tracker::ClientState {
    let state = client(base);
    state
        .session
        .authenticate(&serde_json::from_value(auth_response()).unwrap())
        .unwrap();
    state
}

#[tokio::test]
async fn writes_patch_the_local_store() {
    let (base, db) = backend().await;
    let state = signed_in(&base);
    state.candidatures.load_all().await.unwrap();

    let updated = state
        .candidatures
        .update_status(3, ApplicationStatus::NoResponse)
        .await
        .unwrap();
    assert_eq!(updated.status, ApplicationStatus::NoResponse);
    assert_eq!(
        state.candidatures.store().get(3).map(|c| c.status),
        Some(ApplicationStatus::NoResponse)
    );

    let archived = state.candidatures.toggle_archive(1).await.unwrap();
    assert!(archived.archived);
    assert_eq!(state.candidatures.store().total_active(), 3);

    state.candidatures.delete(4).await.unwrap();
    assert_eq!(state.candidatures.store().total(), 3);
    assert_eq!(db.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn wizard_creates_then_edits() {
    let (base, _db) = backend().await;
    let state = signed_in(&base);
    let mut wizard = CandidatureWizard::create_on(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());

    let err = wizard.submit(&state.candidatures, &state.notifications).await;
    assert!(err.is_err());
    assert_eq!(
        state.notifications.messages(ToastKind::Warning),
        vec!["Veuillez remplir tous les champs obligatoires".to_string()]
    );

    {
        let draft = wizard.draft_mut();
        draft.company = " Initech ".into();
        draft.position = "Ingénieur backend".into();
        draft.location = "Lille".into();
        draft.contact_email = Some("rh@initech.fr".into());
        draft.score = Some(4);
    }
    let created = wizard
        .submit(&state.candidatures, &state.notifications)
        .await
        .unwrap();
    assert_eq!(created.company, "Initech");
    assert_eq!(created.score, Some(4));
    assert_eq!(wizard.mode(), WizardMode::Edit(created.id));
    assert_eq!(state.candidatures.store().total(), 1);

    wizard.draft_mut().status = ApplicationStatus::PhoneInterview;
    let edited = wizard
        .submit(&state.candidatures, &state.notifications)
        .await
        .unwrap();
    assert_eq!(edited.id, created.id);
    assert_eq!(
        state.notifications.messages(ToastKind::Success),
        vec![
            "Candidature ajoutée avec succès".to_string(),
            "Candidature modifiée avec succès".to_string()
        ]
    );
    assert_eq!(
        state.candidatures.store().get(created.id).map(|c| c.status),
        Some(ApplicationStatus::PhoneInterview)
    );
}

#[tokio::test]
async fn editing_a_deleted_record_reports_failure() {
    let (base, _db) = backend().await;
    let state = signed_in(&base);
    let mut c = job_tracker::models::Candidature::new(
        77,
        "Umbrella",
        "SRE",
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ApplicationStatus::Applied,
    );
    c.location = "Rennes".into();
    let mut wizard = CandidatureWizard::edit(&c);

    let err = wizard
        .submit(&state.candidatures, &state.notifications)
        .await
        .unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(
        state.notifications.messages(ToastKind::Error),
        vec!["Erreur lors de la modification de la candidature".to_string()]
    );
}

#[tokio::test]
async fn list_view_filters_sorts_and_remembers_columns() {
    let (base, _db) = backend().await;
    let state = signed_in(&base);
    state.candidatures.load_all().await.unwrap();

    let mut view = state.list_view();
    assert_eq!(view.visible_count(), 4);

    view.set_score_range(5, 5);
    let companies: Vec<String> = view.visible().iter().map(|c| c.company.clone()).collect();
    assert_eq!(companies, vec!["Acme"]);
    assert_eq!(view.active_filter_count(), 1);

    view.clear_filters();
    view.set_search_term("goo");
    assert!(view.sort_by("entreprise"));
    assert_eq!(view.sort_indicator("entreprise"), SortIndicator::Ascending);
    let (rows, info) = view.page(1, 1);
    assert_eq!(rows[0].company, "Goodyear");
    assert_eq!(info.total_items, 2);
    assert!(info.has_next);

    assert!(view.toggle_column("score"));
    let reopened = state.list_view();
    assert!(!reopened.columns().is_visible("score"));
    assert!(reopened.columns().is_visible("entreprise"));
}

#[tokio::test]
async fn open_view_follows_service_writes() {
    let (base, db) = backend().await;
    db.lock().unwrap().push(json!({
        "id": 5,
        "entreprise": "Hooli",
        "poste": "SRE",
        "localisation": null,
        "dateCandidature": "2024-03-05",
        "statut": "APPLIQUEE",
        "archivee": null,
        "userId": null
    }));
    let state = signed_in(&base);
    let mut view = state.list_view();
    assert_eq!(view.visible_count(), 0);

    state.candidatures.load_all().await.unwrap();
    assert_eq!(view.visible_count(), 5);
    view.set_search_term("hooli");
    assert_eq!(view.visible_count(), 1);
    view.clear_filters();

    state.candidatures.toggle_archive(1).await.unwrap();
    let ids: Vec<i64> = view.visible().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 4, 5]);

    state
        .candidatures
        .update_status(2, ApplicationStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(view.find(2).map(|c| c.status), Some(ApplicationStatus::Rejected));

    state.candidatures.delete(4).await.unwrap();
    assert_eq!(view.visible_count(), 3);
    view.set_show_archived(true);
    assert_eq!(view.visible_count(), 4);
}
