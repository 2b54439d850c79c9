use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Map, Value};
use url::Url;

use crate::config::PlatformConfig;
use crate::error::PruneError;
use crate::platform::endpoints::{self, DeleteEndpoint, Endpoint};
use crate::prune::adapter::{AdapterBox, AdapterProvider, ResourceKindAdapter};
use crate::prune::catalogue::Kind;
use crate::prune::orchestrator::CurrentUser;
use crate::types::{Candidate, RunConfig};

/// Header carrying the platform API key
pub const API_KEY_HEADER: &str = "X-FH-AUTH-USER";

/// Thin HTTP client for the platform management API
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    username: Option<String>,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, PruneError> {
        let base = config
            .base_url
            .as_deref()
            .ok_or_else(|| PruneError::config("no platform URL configured"))?;
        let mut base_url = Url::parse(base)
            .map_err(|e| PruneError::config(format!("invalid platform URL '{}': {}", base, e)))?;
        // Endpoint paths are joined relative to the base, so keep its last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            username: config.username.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, PruneError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| PruneError::config(format!("invalid path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    /// Send a listing request and decode the JSON body
    async fn fetch(&self, kind: Kind, method: Method, path: &str) -> Result<Value, PruneError> {
        let url = self.url(path)?;
        let mut builder = self.request(method.clone(), url);
        if method == Method::POST {
            builder = builder.json(&json!({}));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PruneError::list(kind.label(), e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PruneError::list(kind.label(), e.to_string()))?;

        if !status.is_success() {
            return Err(PruneError::list(kind.label(), format!("{}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| PruneError::invalid_response(kind.label(), e.to_string()))
    }

    /// List every resource of `kind`
    pub async fn list(&self, kind: Kind) -> Result<Vec<Candidate>, PruneError> {
        let ep = endpoints::endpoint(kind);
        let mut candidates = self.list_raw(kind, &ep).await?;

        // Guids missing from a successful store item listing belong to items
        // already deleted; the entries are left dangling and get swept.
        if ep.resolve_store_item_names {
            if let Some(names) = self.store_item_names().await {
                for candidate in &mut candidates {
                    match names.get(&candidate.identifier) {
                        Some(name) => candidate.display_name = name.clone(),
                        None => *candidate = Candidate::orphan(candidate.identifier.clone()),
                    }
                }
            }
        }

        Ok(candidates)
    }

    async fn list_raw(&self, kind: Kind, ep: &Endpoint) -> Result<Vec<Candidate>, PruneError> {
        let body = self.fetch(kind, ep.list.method.clone(), ep.list.path).await?;
        let items = collection(kind, body, ep.list.collection)?;
        Ok(to_candidates(kind, ep, items))
    }

    /// guid -> name for store items; `None` when the listing is unavailable
    async fn store_item_names(&self) -> Option<HashMap<String, String>> {
        let ep = endpoints::endpoint(Kind::StoreItems);
        match self.list_raw(Kind::StoreItems, &ep).await {
            Ok(items) => Some(
                items
                    .into_iter()
                    .map(|c| (c.identifier, c.display_name))
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!("Could not resolve app store item names: {}", err);
                None
            }
        }
    }

    /// Delete one resource of `kind`
    pub async fn delete(&self, kind: Kind, candidate: &Candidate, config: &RunConfig) -> Result<(), PruneError> {
        let ep = endpoints::endpoint(kind);
        let id = candidate.identifier.as_str();
        let fail = |reason: String| PruneError::delete(kind.label(), id, reason);

        let builder = match &ep.delete {
            DeleteEndpoint::Resource { method, collection } => {
                let mut url = self.url(collection).map_err(|e| fail(e.to_string()))?;
                url.path_segments_mut()
                    .map_err(|_| fail("platform URL cannot take path segments".to_string()))?
                    .push(id);
                let builder = self.request(method.clone(), url);
                if ep.sends_token {
                    builder.json(&json!({ "token": config.token_or_empty() }))
                } else {
                    builder
                }
            }
            DeleteEndpoint::Action { path, field } => {
                let mut body = Map::new();
                body.insert(field.to_string(), json!(id));
                if ep.sends_token {
                    body.insert("token".to_string(), json!(config.token_or_empty()));
                }
                let url = self.url(path).map_err(|e| fail(e.to_string()))?;
                self.request(Method::POST, url).json(&Value::Object(body))
            }
        };

        let response = builder.send().await.map_err(|e| fail(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("{}: {}", status, body)));
        }

        Ok(())
    }

    /// Ask the platform who the API key belongs to
    pub async fn whoami(&self) -> Result<String, PruneError> {
        let body = self
            .fetch(Kind::Users, Method::GET, endpoints::USER_READ_PATH)
            .await?;

        endpoints::USER_NAME_POINTERS
            .iter()
            .find_map(|p| body.pointer(p).and_then(Value::as_str))
            .map(String::from)
            .ok_or_else(|| PruneError::invalid_response("User", "no username in user record"))
    }
}

/// Locate the item array, re-parsing bodies the platform double-encodes
fn collection(kind: Kind, body: Value, pointer: Option<&str>) -> Result<Vec<Value>, PruneError> {
    let body = decode_string(kind, body)?;
    let items = match pointer {
        Some(p) => body
            .pointer(p)
            .cloned()
            .ok_or_else(|| PruneError::invalid_response(kind.label(), format!("missing '{}' in response", p)))?,
        None => body,
    };

    match decode_string(kind, items)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(PruneError::invalid_response(
            kind.label(),
            format!("expected a list, got {}", type_name(&other)),
        )),
    }
}

fn decode_string(kind: Kind, value: Value) -> Result<Value, PruneError> {
    match value {
        Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|e| PruneError::invalid_response(kind.label(), format!("Invalid {} list: {}", kind.label(), e))),
        other => Ok(other),
    }
}

fn to_candidates(kind: Kind, ep: &Endpoint, items: Vec<Value>) -> Vec<Candidate> {
    items
        .iter()
        .filter_map(|item| {
            let id = match item.pointer(ep.list.id).and_then(scalar) {
                Some(id) => id,
                None => {
                    tracing::warn!("Skipping {} without identifier: {}", kind.label(), item);
                    return None;
                }
            };
            let name = item.pointer(ep.list.name).and_then(scalar).unwrap_or_default();
            Some(Candidate::new(name, id))
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Adapter for one kind backed by the HTTP client
pub struct PlatformAdapter {
    client: PlatformClient,
    kind: Kind,
}

#[async_trait]
impl ResourceKindAdapter for PlatformAdapter {
    async fn list(&self) -> Result<Vec<Candidate>, PruneError> {
        self.client.list(self.kind).await
    }

    async fn delete_one(&self, candidate: &Candidate, config: &RunConfig) -> Result<(), PruneError> {
        self.client.delete(self.kind, candidate, config).await
    }
}

impl AdapterProvider for PlatformClient {
    fn adapter(&self, kind: Kind) -> AdapterBox {
        Arc::new(PlatformAdapter {
            client: self.clone(),
            kind,
        })
    }
}

#[async_trait]
impl CurrentUser for PlatformClient {
    async fn username(&self) -> Option<String> {
        if let Some(user) = &self.username {
            return Some(user.clone());
        }

        match self.whoami().await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("Could not resolve current user: {}", err);
                None
            }
        }
    }
}
