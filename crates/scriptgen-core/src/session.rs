//! Authenticated session against a remote automation server.
//!
//! Thin wrapper around a blocking HTTP client: construction performs an
//! unauthenticated handshake to capture the anti-forgery cookie, and every
//! subsequent request replays it as a header. Never invoked by the
//! generation pipeline; uploading generated content is a separate, manual
//! step.

use crate::error::{Result, ScriptGenError};
use reqwest::blocking::{Client, Response};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

/// Header carrying the anti-forgery token on authenticated requests.
pub const XSRF_TOKEN_HEADER: &str = "X-XSRF-TOKEN";
/// Cookie the server sets on the initial handshake.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

#[derive(Debug)]
pub struct Session {
    http: Client,
    server: String,
    username: String,
    password: String,
    token: String,
}

impl Session {
    /// Open a session against `server`.
    ///
    /// All three parameters must be non-empty. The server URL is
    /// normalized to end with `/`; the handshake GET must set the
    /// [`XSRF_COOKIE`] cookie.
    pub fn connect(username: &str, password: &str, server: &str) -> Result<Self> {
        if username.is_empty() || password.is_empty() || server.is_empty() {
            return Err(ScriptGenError::MissingCredentials);
        }
        let server = if server.ends_with('/') {
            server.to_string()
        } else {
            format!("{server}/")
        };

        let http = Client::builder().cookie_store(true).build()?;
        let handshake = http.get(&server).send()?;
        let token = handshake
            .cookies()
            .find(|c| c.name() == XSRF_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(ScriptGenError::MissingXsrfToken(XSRF_COOKIE))?;

        Ok(Self {
            http,
            server,
            username: username.to_string(),
            password: password.to_string(),
            token,
        })
    }

    /// Normalized server URL, always ending with `/`.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Perform an authenticated request with a JSON-serialized payload.
    ///
    /// `content_type` overrides the `Content-Type` header; JSON is the
    /// default.
    pub fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        content_type: Option<&str>,
        payload: &T,
    ) -> Result<Response> {
        let response = self
            .http
            .request(method, format!("{}{path}", self.server))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or("application/json"),
            )
            .header(XSRF_TOKEN_HEADER, &self.token)
            .json(payload)
            .send()?;
        Ok(response)
    }

    pub fn login(&self) -> Result<Response> {
        let credentials = json!({
            "user": self.username,
            "password": self.password,
        });
        self.request(Method::POST, "login", None, &credentials)
    }

    pub fn logout(&self) -> Result<Response> {
        self.request(Method::POST, "logout", None, &json!({}))
    }

    /// Submit a canned example incident and return the raw response body.
    pub fn create_incident_example(&self) -> Result<String> {
        let payload = json!({
            "type": "Malware",
            "name": "Test Incident",
            "owner": "admin",
            "severity": 2,
            "labels": [{ "type": "label1", "value": "value1" }],
            "details": "Some incident details",
        });
        let response = self.request(Method::POST, "incident", None, &payload)?;
        Ok(response.text()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
