//! Google Secret Manager backend.
//!
//! Talks to the Secret Manager v1 REST API with a blocking HTTP client.
//! Enable with `--features gcp` (on by default).
//!
//! ## Authentication
//!
//! The bearer token comes from `GOOGLE_OAUTH_ACCESS_TOKEN` when set,
//! otherwise from `gcloud auth print-access-token`. A configured credentials
//! file is handed to gcloud through `CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE`.
//!
//! ## Usage
//!
//! ```bash
//! mksecret --project my-project set --name db-password hunter2
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::SecretManager;
use crate::core::domain::{Secret, SecretVersion, VersionRef};
use crate::error::{Result, VaultError};

/// Default Secret Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1";

/// Environment variable holding a ready-made OAuth access token.
pub const TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const PAGE_SIZE: u32 = 100;

/// Secret Manager client bound to one project.
pub struct Gcp {
    client: Client,
    endpoint: String,
    project: String,
    token: Zeroizing<String>,
}

impl std::fmt::Debug for Gcp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gcp")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl Gcp {
    /// Create a client for `project`, acquiring an access token.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Unavailable` if no token can be obtained.
    pub fn new(
        project: String,
        endpoint: Option<String>,
        credentials: Option<PathBuf>,
    ) -> Result<Self> {
        let token = access_token(credentials.as_ref())?;
        let client = Client::builder()
            .user_agent(concat!("mksecret/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VaultError::Unavailable(format!("failed to create http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            project,
            token,
        })
    }

    fn secrets_url(&self) -> String {
        format!("{}/projects/{}/secrets", self.endpoint, self.project)
    }

    fn secret_url(&self, name: &str) -> String {
        format!("{}/{}", self.secrets_url(), name)
    }

    fn version_url(&self, name: &str, version: VersionRef) -> String {
        format!("{}/versions/{}", self.secret_url(name), version)
    }

    fn send<T: for<'de> Deserialize<'de>>(
        &self,
        op: &'static str,
        name: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .bearer_auth(self.token.as_str())
            .send()
            .map_err(|e| VaultError::request(op, e.to_string()))?;

        let status = response.status();
        trace!(op, status = status.as_u16(), "secret manager response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_status(op, name, status, &body).into());
        }

        response
            .json::<T>()
            .map_err(|e| VaultError::request(op, format!("invalid response: {}", e)).into())
    }
}

/// Obtain an OAuth access token.
fn access_token(credentials: Option<&PathBuf>) -> Result<Zeroizing<String>> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            debug!("using access token from {}", TOKEN_ENV);
            return Ok(Zeroizing::new(token.trim().to_string()));
        }
    }

    let gcloud = which::which("gcloud").map_err(|_| {
        VaultError::Unavailable(format!(
            "gcloud CLI not found and {} not set. Install it from https://cloud.google.com/sdk/docs/install",
            TOKEN_ENV
        ))
    })?;

    let mut command = Command::new(gcloud);
    command.args(["auth", "print-access-token"]);
    if let Some(path) = credentials {
        command.env("CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE", path);
    }

    let output = command
        .output()
        .map_err(|e| VaultError::Unavailable(format!("failed to spawn gcloud: {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VaultError::Unavailable(format!(
            "gcloud auth print-access-token failed: {}",
            stderr.trim()
        ))
        .into());
    }

    let token = String::from_utf8(output.stdout)
        .map_err(|_| VaultError::Unavailable("gcloud returned a non-UTF-8 token".to_string()))?;
    Ok(Zeroizing::new(token.trim().to_string()))
}

/// Map an HTTP failure to the vault error convention.
fn map_status(op: &'static str, name: &str, status: StatusCode, body: &str) -> VaultError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::CONFLICT => VaultError::AlreadyExists(name.to_string()),
        StatusCode::NOT_FOUND => VaultError::NotFound(name.to_string()),
        _ => VaultError::request(op, format!("{} {}", status.as_u16(), message)),
    }
}

/// Last path segment of a resource name (`projects/p/secrets/foo` -> `foo`).
fn short_name(resource: &str) -> &str {
    resource.rsplit('/').next().unwrap_or(resource)
}

/// Version number from a version resource name.
fn version_number(op: &'static str, resource: &str) -> Result<u64> {
    short_name(resource).parse().map_err(|_| {
        VaultError::request(op, format!("unexpected version name: {}", resource)).into()
    })
}

// Wire types. Field names follow the API's JSON mapping.

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateSecretBody<'a> {
    replication: Replication,
    labels: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Replication {
    automatic: Automatic,
}

#[derive(Debug, Serialize)]
struct Automatic {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretResource {
    name: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    create_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl SecretResource {
    fn into_secret(self) -> Secret {
        let secret = Secret::new(short_name(&self.name), self.labels);
        match self.create_time {
            Some(created) => secret.with_created(created),
            None => secret,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSecretsResponse {
    #[serde(default)]
    secrets: Vec<SecretResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddVersionBody {
    payload: PayloadBody,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadBody {
    data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_crc32c: Option<Int64>,
}

/// int64 fields travel as JSON strings, but accept numbers too.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Int64 {
    Text(String),
    Number(i64),
}

impl Int64 {
    fn checksum(&self) -> Option<u32> {
        match self {
            Int64::Text(s) => s.parse::<u32>().ok(),
            Int64::Number(n) => u32::try_from(*n).ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    name: String,
    payload: PayloadBody,
}

impl SecretManager for Gcp {
    fn name(&self) -> &'static str {
        "gcp"
    }

    fn create_secret(&self, name: &str, labels: &BTreeMap<String, String>) -> Result<Secret> {
        debug!(name, "creating secret");
        let body = CreateSecretBody {
            replication: Replication {
                automatic: Automatic {},
            },
            labels,
        };
        let request = self
            .client
            .post(self.secrets_url())
            .query(&[("secretId", name)])
            .json(&body);
        let resource: SecretResource = self.send("create secret", name, request)?;
        Ok(resource.into_secret())
    }

    fn get_secret(&self, name: &str) -> Result<Secret> {
        let request = self.client.get(self.secret_url(name));
        let resource: SecretResource = self.send("get secret", name, request)?;
        Ok(resource.into_secret())
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        debug!(name, "deleting secret");
        let request = self.client.delete(self.secret_url(name));
        let _: serde_json::Value = self.send("delete secret", name, request)?;
        Ok(())
    }

    fn list_secrets(&self, filter: (&str, &str)) -> Result<Vec<Secret>> {
        let filter = format!("labels.{}={}", filter.0, filter.1);
        let page_size = PAGE_SIZE.to_string();
        let mut secrets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("filter", filter.as_str()), ("pageSize", page_size.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let request = self.client.get(self.secrets_url()).query(&query);
            let page: ListSecretsResponse = self.send("list secrets", &self.project, request)?;

            trace!(count = page.secrets.len(), "listed page");
            secrets.extend(page.secrets.into_iter().map(SecretResource::into_secret));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(secrets)
    }

    fn add_version(&self, name: &str, payload: &[u8], checksum: u32) -> Result<u64> {
        trace!(name, payload_len = payload.len(), "adding version");
        let body = AddVersionBody {
            payload: PayloadBody {
                data: BASE64.encode(payload),
                data_crc32c: Some(Int64::Text(checksum.to_string())),
            },
        };
        let request = self
            .client
            .post(format!("{}:addVersion", self.secret_url(name)))
            .json(&body);
        let resource: VersionResource = self.send("add secret version", name, request)?;
        version_number("add secret version", &resource.name)
    }

    fn access_version(&self, name: &str, version: VersionRef) -> Result<SecretVersion> {
        let request = self
            .client
            .get(format!("{}:access", self.version_url(name, version)));
        let response: AccessResponse = self.send("access secret version", name, request)?;

        let payload = BASE64.decode(response.payload.data.as_bytes()).map_err(|e| {
            VaultError::request("access secret version", format!("invalid payload: {}", e))
        })?;

        Ok(SecretVersion {
            name: name.to_string(),
            version: version_number("access secret version", &response.name)?,
            payload,
            checksum: response.payload.data_crc32c.as_ref().and_then(Int64::checksum),
        })
    }
}
