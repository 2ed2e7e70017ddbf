//! HTTP client wrapper - collection endpoint calls and response decoding

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Draft, Exhibit, MutationOutcome, Record, Resource, VirtualTour};

/// Failure talking to a collection endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connect(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Client for the two collection endpoints
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    exhibits_url: String,
    tours_url: String,
}

impl ApiClient {
    pub fn new(exhibits_url: impl Into<String>, tours_url: impl Into<String>, timeout: Duration) -> Self {
        ApiClient {
            http: create_client(timeout),
            exhibits_url: exhibits_url.into(),
            tours_url: tours_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ApiClient::new(&config.exhibits_api, &config.tours_api, config.request_timeout())
    }

    pub fn endpoint(&self, resource: Resource) -> &str {
        match resource {
            Resource::Exhibits => &self.exhibits_url,
            Resource::Tours => &self.tours_url,
        }
    }

    pub async fn list_exhibits(&self) -> Result<Vec<Exhibit>, ApiError> {
        self.list(Resource::Exhibits).await
    }

    pub async fn list_tours(&self) -> Result<Vec<VirtualTour>, ApiError> {
        self.list(Resource::Tours).await
    }

    /// GET the collection
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let resp = self.http.get(self.endpoint(resource)).send().await?;
        let body = check_status(resp).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST the draft. Returns the stored record if the body decodes as one.
    pub async fn create(&self, draft: &Draft) -> Result<Option<Record>, ApiError> {
        let resource = draft.resource();
        let resp = self
            .http
            .post(self.endpoint(resource))
            .json(&draft.create_body())
            .send()
            .await?;
        let body = check_status(resp).await?;
        Ok(decode_record(resource, &body))
    }

    /// PUT the draft fields plus `id`
    pub async fn update(&self, id: i64, draft: &Draft) -> Result<Option<Record>, ApiError> {
        let resource = draft.resource();
        let resp = self
            .http
            .put(self.endpoint(resource))
            .json(&draft.update_body(id))
            .send()
            .await?;
        let body = check_status(resp).await?;
        Ok(decode_record(resource, &body))
    }

    /// DELETE `?id=<id>`
    pub async fn delete(&self, resource: Resource, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.endpoint(resource))
            .query(&[("id", id)])
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Run one command and turn the result into a response for the app layer
    pub async fn execute(&self, command: NetworkCommand) -> Option<NetworkResponse> {
        let start = Instant::now();
        let (id, resource, action) = (command.id()?, command.resource()?, command.action()?);

        let result = match command {
            NetworkCommand::Fetch { resource: Resource::Exhibits, .. } => self
                .list_exhibits()
                .await
                .map(|exhibits| NetworkResponse::ExhibitsLoaded { id, exhibits }),
            NetworkCommand::Fetch { resource: Resource::Tours, .. } => self
                .list_tours()
                .await
                .map(|tours| NetworkResponse::ToursLoaded { id, tours }),
            NetworkCommand::Create { draft, .. } => self.create(&draft).await.map(|record| {
                NetworkResponse::Mutated {
                    id,
                    outcome: MutationOutcome::Created { resource, record },
                }
            }),
            NetworkCommand::Update { record_id, draft, .. } => {
                self.update(record_id, &draft).await.map(|record| NetworkResponse::Mutated {
                    id,
                    outcome: MutationOutcome::Updated {
                        resource,
                        record_id,
                        record,
                    },
                })
            }
            NetworkCommand::Delete { record_id, .. } => {
                self.delete(resource, record_id).await.map(|()| NetworkResponse::Mutated {
                    id,
                    outcome: MutationOutcome::Deleted { resource, record_id },
                })
            }
            NetworkCommand::Shutdown => return None,
        };

        let elapsed = start.elapsed().as_millis() as u64;
        Some(match result {
            Ok(response) => {
                tracing::info!(id, resource = resource.as_str(), ?action, elapsed, "Request completed");
                response
            }
            Err(e) => {
                tracing::warn!(id, resource = resource.as_str(), ?action, elapsed, error = %e, "Request failed");
                NetworkResponse::Failed {
                    id,
                    resource,
                    action,
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Read the body, mapping non-2xx to [`ApiError::Status`]
async fn check_status(resp: reqwest::Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        let mut message = error_message(&body);
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("no details").to_string();
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            body: message,
        })
    }
}

/// Pull `{"error": "..."}` out of an error body, else return it trimmed
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

fn decode_record(resource: Resource, body: &str) -> Option<Record> {
    match resource {
        Resource::Exhibits => serde_json::from_str(body).ok().map(Record::Exhibit),
        Resource::Tours => serde_json::from_str(body).ok().map(Record::Tour),
    }
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
