//! # Academy HTTP Client
//!
//! Wrapper around the academy REST API used by the CLI.

use blackbelt_core::{
    AccountError, Athlete, AthleteUpdate, Championship, NewClass, RegistrationPayload, Student,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Cannot reach the academy API.
    #[error("Cannot connect to the academy API at {0}")]
    ConnectionFailed(String),

    /// 401 Unauthorized - invalid or missing API token.
    #[error("Unauthorized: invalid or missing API token")]
    Unauthorized,

    /// Any other non-2xx answer, with the message extracted from its body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<ClientError> for AccountError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ConnectionFailed(url) => AccountError::Unreachable(url),
            ClientError::Api { status, message } if status >= 500 => {
                AccountError::Unreachable(message)
            }
            ClientError::Api { message, .. } => AccountError::Rejected(message),
            other @ (ClientError::Unauthorized | ClientError::ParseError(_)) => {
                AccountError::Rejected(other.to_string())
            }
        }
    }
}

/// Human-readable message from an error response body.
///
/// The API answers either with a JSON object carrying `message` or with a
/// plain text body. An empty body falls back to the status reason.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    if let Some(text) = parsed.as_ref().and_then(|v| v.as_str()) {
        return text.to_string();
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

/// HTTP client that wraps calls to the academy REST API.
#[derive(Debug, Clone)]
pub struct AcademyClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AcademyClient {
    /// Create a new client pointing at the given API base URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Turn non-2xx answers into errors.
    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::debug!(status = status.as_u16(), %message, "academy API error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.request(reqwest::Method::GET, path);
        let resp = self.check(self.send(req).await?).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// POST /register → create an account.
    pub async fn register(&self, payload: &RegistrationPayload) -> Result<(), ClientError> {
        let req = self.request(reqwest::Method::POST, "/register").json(payload);
        self.check(self.send(req).await?).await?;
        Ok(())
    }

    /// GET /athlete → every athlete of the academy.
    pub async fn athletes(&self) -> Result<Vec<Athlete>, ClientError> {
        self.get_json("/athlete").await
    }

    /// GET /athlete/{id}
    pub async fn athlete(&self, id: u64) -> Result<Athlete, ClientError> {
        self.get_json(&format!("/athlete/{id}")).await
    }

    /// PUT /athlete/{id}
    pub async fn update_athlete(&self, id: u64, update: &AthleteUpdate) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/athlete/{id}"))
            .json(update);
        self.check(self.send(req).await?).await?;
        Ok(())
    }

    /// DELETE /athlete/{id}
    pub async fn delete_athlete(&self, id: u64) -> Result<(), ClientError> {
        let req = self.request(reqwest::Method::DELETE, &format!("/athlete/{id}"));
        self.check(self.send(req).await?).await?;
        Ok(())
    }

    /// GET /championships
    pub async fn championships(&self) -> Result<Vec<Championship>, ClientError> {
        self.get_json("/championships").await
    }

    /// GET /students
    pub async fn students(&self) -> Result<Vec<Student>, ClientError> {
        self.get_json("/students").await
    }

    /// POST /classes → schedule a class.
    pub async fn create_class(&self, class: &NewClass) -> Result<(), ClientError> {
        let req = self.request(reqwest::Method::POST, "/classes").json(class);
        self.check(self.send(req).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn message_field_is_preferred() {
        let body = r#"{"message":"E-mail already registered","code":7}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "E-mail already registered"
        );
    }

    #[test]
    fn plain_text_body_is_used_as_is() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, "CPF already in use\n"),
            "CPF already in use"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, "\"quoted text\""),
            "quoted text"
        );
    }

    #[test]
    fn empty_body_falls_back_to_reason() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn server_errors_are_retryable() {
        let err: AccountError = ClientError::Api {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert!(err.is_retryable());

        let err: AccountError = ClientError::Api {
            status: 409,
            message: "taken".into(),
        }
        .into();
        assert_eq!(err, AccountError::Rejected("taken".into()));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = AcademyClient::new("http://localhost:3333/", None);
        assert_eq!(client.base_url(), "http://localhost:3333");
    }
}
