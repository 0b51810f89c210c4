// API client module: a small blocking HTTP client that talks to the
// Artifactory REST API. Every call is synchronous; the menu loop waits for
// the answer before it shows the menu again.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub const TOKEN_ENDPOINT: &str = "security/token";
pub const PING_ENDPOINT: &str = "system/ping";
pub const VERSION_ENDPOINT: &str = "system/version";
pub const STORAGE_INFO_ENDPOINT: &str = "storageinfo";
pub const REPOSITORIES_ENDPOINT: &str = "repositories";

/// Username/password pair exchanged for bearer tokens.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One call against `base_url + endpoint`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        ApiRequest {
            method: Method::GET,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        ApiRequest {
            method: Method::DELETE,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn put_json<T: Serialize>(endpoint: impl Into<String>, body: &T) -> Result<Self> {
        Self::with_json(Method::PUT, endpoint, body)
    }

    pub fn post_json<T: Serialize>(endpoint: impl Into<String>, body: &T) -> Result<Self> {
        Self::with_json(Method::POST, endpoint, body)
    }

    fn with_json<T: Serialize>(
        method: Method,
        endpoint: impl Into<String>,
        body: &T,
    ) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::validation(format!("cannot encode request body: {}", e)))?;
        Ok(ApiRequest {
            method,
            endpoint: endpoint.into(),
            body: Some(body),
        })
    }
}

/// Status and raw body of any HTTP answer, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx answer into `Error::Http`.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Http {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::Response(format!("invalid JSON body: {}", e)))
    }
}

/// Payload for `PUT security/users/{name}`. Email and password are
/// mandatory on the server side, name is optional.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Minimal remote repository configuration for `PUT repositories/{key}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepository {
    pub rclass: String,
    pub url: String,
    /// Only meaningful for Docker repositories.
    pub external_dependencies_enabled: bool,
}

/// Partial configuration for `POST repositories/{key}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct RepositoryUpdate {
    pub description: String,
}

/// Payload for `PUT security/groups/{name}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub auto_join: bool,
}

#[derive(Deserialize, Debug)]
pub struct VersionInfo {
    pub version: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Everything the session needs from the network. `ApiClient` is the real
/// implementation; tests substitute a recording fake.
pub trait Transport {
    /// API base URL, always ending in `/`.
    fn base_url(&self) -> &str;

    /// Exchange credentials for a token scoped to `group`.
    fn issue_token(&self, credentials: &Credentials, group: &str) -> Result<String>;

    /// Attach `Authorization: Bearer <token>` to every later `send`.
    fn set_bearer(&mut self, token: &str) -> Result<()>;

    /// Issue one request. Any HTTP status is returned as a response; only
    /// transport failures are errors.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Blocking reqwest client bound to one Artifactory API base URL.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (for example
    /// `https://acme.jfrog.io/artifactory/api/`). No token is attached yet.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(Error::Config("API base URL is empty".into()));
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let client = Client::builder().build()?;
        Ok(ApiClient { client, base_url })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

/// Spinner on stderr while a call is in flight. indicatif hides it when
/// stderr is not a terminal.
fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

impl Transport for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issue_token(&self, credentials: &Credentials, group: &str) -> Result<String> {
        let url = self.url(TOKEN_ENDPOINT);
        let scope = format!("member-of-groups:{}", group);
        let form = [
            ("username", credentials.username()),
            ("password", credentials.password()),
            ("scope", scope.as_str()),
        ];
        debug!(%url, group, "requesting access token");

        let progress = spinner(format!("Requesting token for group '{}'...", group));
        let sent = self
            .client
            .post(&url)
            .basic_auth(credentials.username(), Some(credentials.password()))
            .form(&form)
            .send();
        progress.finish_and_clear();

        let res = sent.map_err(|e| Error::Auth(format!("token request failed: {}", e)))?;
        let status = res.status();
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            return Err(Error::Auth(format!("{} - {}", status, txt)));
        }
        let parsed: TokenResponse = res
            .json()
            .map_err(|e| Error::Auth(format!("malformed token response: {}", e)))?;
        let token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth("response carries no access_token".into()))?;
        info!(group, "access token issued");
        Ok(token)
    }

    fn set_bearer(&mut self, token: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Auth("token is not a valid header value".into()))?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        self.client = Client::builder().default_headers(headers).build()?;
        Ok(())
    }

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.endpoint);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let progress = spinner(format!("{} {}", request.method, request.endpoint));
        let sent = builder.send();
        progress.finish_and_clear();

        let res = sent?;
        let status = res.status().as_u16();
        let body = res.text()?;
        debug!(status, "received response");
        Ok(ApiResponse { status, body })
    }
}
