use chrono::{DateTime, Utc};
use dsmig_core::{Config, Method};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{StoreError, TargetStore, TrackingStore};

pub const TRACKING_COLLECTION: &str = "operations";

fn tracking_mapping() -> Value {
    serde_json::json!({
        "mappings": { "properties": { "inserted_at": { "type": "date" } } }
    })
}

/// Blocking HTTP client for the target store. Implements both store traits:
/// user operations and the tracking protocol go over the same transport.
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    client: Client,
    base: Url,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackingRecord {
    pub(crate) inserted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default)]
    found: bool,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    result: String,
}

impl HttpStoreClient {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let base = connection_url(config)?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    fn request(&self, method: Method, uri: &str) -> RequestBuilder {
        let url = resolve_uri(&self.base, uri);
        self.client.request(to_http_method(method), url)
    }

    fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&impl Serialize>,
    ) -> Result<Response, StoreError> {
        let mut request = self.request(method, uri);
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn send_validated(
        &self,
        method: Method,
        uri: &str,
        body: Option<&impl Serialize>,
    ) -> Result<(), StoreError> {
        validate_status(self.send(method, uri, body)?)
    }

    fn tracking_doc_uri(id: &str) -> String {
        format!("{TRACKING_COLLECTION}/_doc/{id}")
    }
}

impl TargetStore for HttpStoreClient {
    fn execute(
        &self,
        method: Method,
        uri: &str,
        body: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let body = if body.is_empty() { None } else { Some(body) };
        self.send_validated(method, uri, body)
    }
}

impl TrackingStore for HttpStoreClient {
    fn ensure_collection(&self) -> Result<(), StoreError> {
        let probe = self.send(Method::Head, TRACKING_COLLECTION, None::<&Value>)?;
        if probe.status().is_success() {
            return Ok(());
        }

        self.send_validated(Method::Put, TRACKING_COLLECTION, Some(&tracking_mapping()))
    }

    fn is_applied(&self, id: &str) -> Result<bool, StoreError> {
        // A missing document answers with a non-2xx status whose body still
        // carries `found: false`, so the body is authoritative, not the status.
        let response = self.send(Method::Get, &Self::tracking_doc_uri(id), None::<&Value>)?;
        let raw = response
            .text()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        parse_exists_body(&raw)
    }

    fn record_applied(&self, id: &str) -> Result<(), StoreError> {
        let record = TrackingRecord {
            inserted_at: Utc::now(),
        };
        self.send_validated(Method::Post, &Self::tracking_doc_uri(id), Some(&record))
    }

    fn clear_applied(&self, id: &str) -> Result<(), StoreError> {
        let response = self.send(Method::Delete, &Self::tracking_doc_uri(id), None::<&Value>)?;
        let raw = response
            .text()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        parse_delete_body(&raw, id)
    }
}

pub(crate) fn connection_url(config: &Config) -> Result<Url, StoreError> {
    let mut base = Url::parse(&config.conn).map_err(|err| StoreError::Connection {
        url: config.conn.clone(),
        reason: err.to_string(),
    })?;

    if let Some(username) = &config.username {
        let accepted = base.set_username(username).is_ok()
            && base.set_password(config.password.as_deref()).is_ok();
        if !accepted {
            return Err(StoreError::Connection {
                url: config.conn.clone(),
                reason: "url cannot carry credentials".to_string(),
            });
        }
    }

    Ok(base)
}

pub(crate) fn resolve_uri(base: &Url, uri: &str) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        uri.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}

fn to_http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Head => reqwest::Method::HEAD,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn validate_status(response: Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn parse_exists_body(raw: &str) -> Result<bool, StoreError> {
    let parsed: ExistsResponse = serde_json::from_str(raw)
        .map_err(|_| StoreError::UnexpectedBody(format!("existence probe body: {raw}")))?;
    Ok(parsed.found)
}

pub(crate) fn parse_delete_body(raw: &str, id: &str) -> Result<(), StoreError> {
    let parsed: DeleteResponse = serde_json::from_str(raw)
        .map_err(|_| StoreError::UnexpectedBody(format!("delete confirmation body: {raw}")))?;

    if parsed.result == "deleted" {
        return Ok(());
    }

    Err(StoreError::UnexpectedBody(format!(
        "tracking record '{id}' was not deleted: {raw}"
    )))
}
