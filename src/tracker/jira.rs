//! Jira tracker implementation using the REST v2 API.
//!
//! # Endpoints
//!
//! - `GET /rest/api/2/issue/createmeta` - issue types per project
//! - `POST /rest/api/2/issue` - create an issue
//! - `POST /rest/api/2/issue/{key}/attachments` - upload a file
//!
//! Every request carries Basic credentials and a fixed User-Agent.
//!
//! # Errors
//!
//! Any status outside 2xx is an error. Jira reports problems as
//! `{"errorMessages": [...], "errors": {"field": "reason"}}`; both parts are
//! folded into the error message, falling back to the raw body.
//!
//! # Example
//!
//! ```ignore
//! use faultline::tracker::{JiraTracker, Tracker};
//!
//! let tracker = JiraTracker::new(&config);
//! let types = tracker.issue_types("QA").await?;
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{CreateIssueRequest, Tracker, TrackerError};
use crate::core::config::RunConfig;
use crate::core::types::{FiledIssue, IssueTypeEntry};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "faultline";

/// Content type of every uploaded attachment.
const ATTACHMENT_MIME: &str = "application/zip";

/// Multipart field Jira expects the upload under.
const ATTACHMENT_FIELD: &str = "file";

/// Header Jira requires on attachment uploads to skip its XSRF check.
const XSRF_HEADER: &str = "X-Atlassian-Token";

/// Jira tracker implementation.
pub struct JiraTracker {
    /// HTTP client for making requests
    client: Client,
    /// Instance base URL, without trailing slash
    base_url: String,
    /// Basic auth user
    identity: String,
    /// Basic auth password or API token
    secret: String,
}

// Custom Debug to avoid exposing the secret
impl std::fmt::Debug for JiraTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraTracker")
            .field("base_url", &self.base_url)
            .field("identity", &self.identity)
            .field("has_secret", &!self.secret.is_empty())
            .finish()
    }
}

impl JiraTracker {
    /// Create a tracker from run configuration.
    pub fn new(config: &RunConfig) -> Self {
        Self::with_credentials(&config.base_url, &config.identity, &config.secret)
    }

    /// Create a tracker from explicit connection details.
    ///
    /// A trailing `/` on `base_url` is dropped.
    pub fn with_credentials(
        base_url: impl Into<String>,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Get the instance base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.base_url, path)
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// Attach headers and credentials to a request.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .headers(Self::headers())
            .basic_auth(&self.identity, Some(&self.secret))
    }

    /// Send a request, mapping transport failures.
    async fn send(builder: RequestBuilder) -> Result<Response, TrackerError> {
        builder
            .send()
            .await
            .map_err(|e| TrackerError::NetworkError(e.to_string()))
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, TrackerError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                TrackerError::Protocol(format!("failed to parse response: {}", e))
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, TrackerError> {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                TrackerError::AuthFailed("invalid credentials".into())
            }
            StatusCode::FORBIDDEN => {
                TrackerError::AuthFailed(format!("permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => TrackerError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => TrackerError::RateLimited,
            _ if status.is_server_error() => TrackerError::ApiError {
                status: status.as_u16(),
                message: format!("Jira server error: {}", message),
            },
            _ => TrackerError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Fold a Jira error body into one line.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<JiraErrorResponse>(body) {
        let mut parts = parsed.error_messages;
        parts.extend(
            parsed
                .errors
                .into_iter()
                .map(|(field, reason)| format!("{}: {}", field, reason)),
        );
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Flatten createmeta projects into issue type entries.
fn collect_issue_types(meta: CreateMetaResponse) -> Result<Vec<IssueTypeEntry>, TrackerError> {
    let projects = meta
        .projects
        .ok_or_else(|| TrackerError::Protocol("no projects returned by createmeta".into()))?;

    Ok(projects
        .into_iter()
        .flat_map(|p| p.issuetypes)
        .filter(|t| !t.id.trim().is_empty() && !t.name.trim().is_empty())
        .map(|t| IssueTypeEntry::new(t.id, t.name))
        .collect())
}

#[async_trait]
impl Tracker for JiraTracker {
    fn name(&self) -> &'static str {
        "jira"
    }

    async fn issue_types(&self, project_key: &str) -> Result<Vec<IssueTypeEntry>, TrackerError> {
        let request = self
            .client
            .get(self.api_url("issue/createmeta"))
            .query(&[
                ("projectKeys", project_key),
                ("expand", "projects.issuetypes"),
            ]);
        let response = Self::send(self.authorized(request)).await?;
        let meta: CreateMetaResponse = self.handle_response(response).await?;
        collect_issue_types(meta)
    }

    async fn create_issue(&self, request: CreateIssueRequest) -> Result<FiledIssue, TrackerError> {
        let body = JiraCreateIssue::from(&request);
        let builder = self.client.post(self.api_url("issue")).json(&body);
        let response = Self::send(self.authorized(builder)).await?;
        let created: JiraCreatedIssue = self.handle_response(response).await?;

        match created.key {
            Some(key) if !key.trim().is_empty() => Ok(FiledIssue::from_key(&self.base_url, key)),
            _ => Err(TrackerError::Protocol(
                "issue created but no key returned".into(),
            )),
        }
    }

    async fn attach_file(&self, issue_key: &str, path: &Path) -> Result<(), TrackerError> {
        let read_err = |message: String| TrackerError::AttachmentRead {
            path: path.to_path_buf(),
            message,
        };

        let bytes = fs::read(path).map_err(|e| read_err(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| read_err("path has no file name".into()))?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(ATTACHMENT_MIME)
            .map_err(|e| read_err(e.to_string()))?;
        let form = Form::new().part(ATTACHMENT_FIELD, part);

        let builder = self
            .client
            .post(self.api_url(&format!("issue/{}/attachments", issue_key)))
            .header(XSRF_HEADER, "no-check")
            .multipart(form);
        let response = Self::send(self.authorized(builder)).await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response, status).await
        }
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct JiraErrorResponse {
    #[serde(rename = "errorMessages", default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CreateMetaResponse {
    projects: Option<Vec<CreateMetaProject>>,
}

#[derive(Debug, Deserialize)]
struct CreateMetaProject {
    #[serde(default)]
    issuetypes: Vec<CreateMetaIssueType>,
}

#[derive(Debug, Deserialize)]
struct CreateMetaIssueType {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
struct JiraCreateIssue<'a> {
    fields: JiraIssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct JiraIssueFields<'a> {
    project: JiraKeyRef<'a>,
    summary: &'a str,
    description: &'a str,
    issuetype: JiraIdRef<'a>,
    labels: &'a [String],
}

#[derive(Debug, Serialize)]
struct JiraKeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct JiraIdRef<'a> {
    id: &'a str,
}

impl<'a> From<&'a CreateIssueRequest> for JiraCreateIssue<'a> {
    fn from(request: &'a CreateIssueRequest) -> Self {
        Self {
            fields: JiraIssueFields {
                project: JiraKeyRef {
                    key: &request.project_key,
                },
                summary: &request.summary,
                description: &request.description,
                issuetype: JiraIdRef {
                    id: &request.issue_type_id,
                },
                labels: &request.labels,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct JiraCreatedIssue {
    key: Option<String>,
}
