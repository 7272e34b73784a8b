#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use job_tracker::config::Config;
use job_tracker::storage::{MemoryStorage, Storage};
use job_tracker::ClientState;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TOKEN: &str = "tok-123";

/// Serves `router` on a random local port and returns the API base URL.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}/api", addr)
}

pub fn client(base_url: &str) -> ClientState {
    client_with(Config::new(base_url), Arc::new(MemoryStorage::new()))
}

pub fn client_with(config: Config, storage: Arc<dyn Storage>) -> ClientState {
    ClientState::with_storage(config, storage).expect("client state")
}

/// Requests seen by the fake backend.
#[derive(Clone, Default)]
pub struct Recorder {
    pub authorization: Arc<Mutex<Vec<Option<String>>>>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.authorization.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

pub fn auth_response() -> Value {
    json!({
        "token": TOKEN,
        "user": { "id": 1, "email": "jean@example.com", "nom": "Dupont", "prenom": "Jean" }
    })
}

pub fn candidature(id: i64, company: &str, status: &str, score: Option<u8>) -> Value {
    let mut value = json!({
        "id": id,
        "entreprise": company,
        "poste": "Développeur",
        "localisation": "Paris",
        "dateCandidature": format!("2024-03-{:02}", id),
        "statut": status,
        "archivee": false
    });
    if let Some(score) = score {
        value["score"] = json!(score);
    }
    value
}

pub fn sample_candidatures() -> Vec<Value> {
    vec![
        candidature(1, "Google", "APPLIQUEE", Some(3)),
        candidature(2, "Acme", "OFFRE", Some(5)),
        candidature(3, "Globex", "REFUSEE", None),
        candidature(4, "Goodyear", "ENTRETIEN_RH", Some(2)),
    ]
}
