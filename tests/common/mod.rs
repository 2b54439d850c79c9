use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request received by the fake platform
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Value,
    pub api_key: Option<String>,
}

#[derive(Default)]
struct Inner {
    lists: HashMap<String, Value>,
    actions: HashSet<String>,
    failing: HashSet<String>,
    /// action path -> (list path, key field) of the listing it shrinks
    removes: HashMap<String, (String, String)>,
    requests: Vec<Request>,
}

type Shared = Arc<Mutex<Inner>>;

/// In-memory stand-in for the platform management API
pub struct FakePlatform {
    pub base_url: String,
    inner: Shared,
}

impl FakePlatform {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let inner: Shared = Arc::new(Mutex::new(Inner::default()));

        // Environment listing failures fail the whole run, so start with none
        inner
            .lock()
            .unwrap()
            .lists
            .insert("/api/v2/environments".to_string(), json!([]));

        let app = Router::new().fallback(handle).with_state(inner.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind fake platform")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url, inner })
    }

    /// Serve `body` for GET/POST on `path`
    pub fn list(&self, path: &str, body: Value) -> &Self {
        self.inner.lock().unwrap().lists.insert(path.to_string(), body);
        self
    }

    /// Accept POST on `path` as a delete action
    pub fn action(&self, path: &str) -> &Self {
        self.inner.lock().unwrap().actions.insert(path.to_string());
        self
    }

    /// Accept POST on `action` and drop the item with the posted `field`
    /// value from the `/list` array served at `list_path`
    pub fn removes(&self, action: &str, list_path: &str, field: &str) -> &Self {
        let mut inner = self.inner.lock().unwrap();
        inner.actions.insert(action.to_string());
        inner
            .removes
            .insert(action.to_string(), (list_path.to_string(), field.to_string()));
        drop(inner);
        self
    }

    /// Answer 500 for requests to `path` (for DELETE the full resource path)
    pub fn fail(&self, path: &str) -> &Self {
        self.inner.lock().unwrap().failing.insert(path.to_string());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Paths hit with DELETE
    pub fn deleted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::DELETE)
            .map(|r| r.path)
            .collect();
        paths.sort();
        paths
    }

    /// Bodies posted to an action path
    pub fn action_bodies(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::POST && r.path == path)
            .map(|r| r.body)
            .collect()
    }

    pub fn was_called(&self, path: &str) -> bool {
        self.requests().iter().any(|r| r.path == path)
    }
}

async fn handle(State(inner): State<Shared>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let api_key = headers
        .get("x-fh-auth-user")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let mut inner = inner.lock().unwrap();
    inner.requests.push(Request {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
        api_key,
    });

    if inner.failing.contains(&path) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    if method == Method::DELETE {
        return Json(json!({ "status": "ok" })).into_response();
    }

    if method == Method::POST && inner.actions.contains(&path) {
        if let Some((list_path, field)) = inner.removes.get(&path).cloned() {
            let key = body.get(&field).cloned();
            if let Some(Value::Array(items)) = inner
                .lists
                .get_mut(&list_path)
                .and_then(|l| l.get_mut("list"))
            {
                items.retain(|item| item.get(&field) != key.as_ref());
            }
        }
        return Json(json!({ "status": "ok" })).into_response();
    }

    match inner.lists.get(&path) {
        Some(body) => Json(body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
