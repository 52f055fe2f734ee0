//! In-process stand-in for the Rabby balance endpoint.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Instant,
};
use tokio::net::TcpListener;

/// One request the mock received
#[derive(Debug, Clone)]
pub struct Hit {
    pub at: Instant,
    pub id: Option<String>,
    pub accept: Option<String>,
    pub accept_language: Option<String>,
}

struct Script {
    responses: Vec<(StatusCode, String)>,
    hits: Vec<Hit>,
}

/// Serves the scripted responses in order, repeating the last one.
pub struct MockRabby {
    pub url: String,
    script: Arc<Mutex<Script>>,
}

impl MockRabby {
    pub async fn start(responses: Vec<(StatusCode, String)>) -> Self {
        assert!(!responses.is_empty(), "mock needs at least one response");

        let script = Arc::new(Mutex::new(Script {
            responses,
            hits: Vec::new(),
        }));
        let app = Router::new()
            .route("/v1/user/total_balance", get(total_balance))
            .with_state(Arc::clone(&script));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/v1/user/total_balance"),
            script,
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.script.lock().unwrap().hits.clone()
    }
}

async fn total_balance(
    State(script): State<Arc<Mutex<Script>>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut script = script.lock().unwrap();
    let idx = script.hits.len().min(script.responses.len() - 1);
    script.hits.push(Hit {
        at: Instant::now(),
        id: query.get("id").cloned(),
        accept: header_str(header::ACCEPT),
        accept_language: header_str(header::ACCEPT_LANGUAGE),
    });
    script.responses[idx].clone()
}

/// Successful Rabby payload for the given total and chains.
pub fn balance_json(total: f64, chains: &[(&str, f64)]) -> String {
    let chain_list: Vec<_> = chains
        .iter()
        .map(|(name, usd)| json!({ "name": name, "native_token_id": "eth", "usd_value": usd }))
        .collect();

    json!({
        "error_code": 0,
        "total_usd_value": total,
        "chain_list": chain_list,
    })
    .to_string()
}
