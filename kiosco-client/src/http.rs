//! HTTP client for the kiosco backend REST API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::response::ErrorBody;

/// HTTP client for making network requests to the backend.
///
/// One instance is shared by every screen; the bearer token is updated
/// in place when the session changes so the 401 policy stays uniform.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Set the bearer token after a successful login.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token (logout or forced session invalidation).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the current token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with_query(path, &[]).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(path = %path, "GET");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body.
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(path = %path, "POST");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body.
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.put(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(path = %path, "PUT");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let mut request = self.client.delete(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(path = %path, "DELETE");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::status_error(status, &response.text().await.unwrap_or_default()))
    }

    /// Handle the HTTP response, mapping non-2xx statuses onto the error
    /// taxonomy and surfacing the backend's `detail` field when present.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &text));
        }

        response.json().await.map_err(Into::into)
    }

    fn status_error(status: StatusCode, body: &str) -> ClientError {
        let detail = ErrorBody::detail_from(body).unwrap_or_else(|| body.to_string());
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(detail),
            StatusCode::NOT_FOUND => ClientError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(detail)
            }
            _ => ClientError::Internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(&ClientConfig::new("http://localhost:8000/"))
    }

    #[test]
    fn url_joins_without_double_slash() {
        let c = client();
        assert_eq!(c.url("/productos"), "http://localhost:8000/productos");
        assert_eq!(c.url("ventas/3"), "http://localhost:8000/ventas/3");
    }

    #[test]
    fn status_error_maps_the_taxonomy() {
        assert!(matches!(
            HttpClient::status_error(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized
        ));
        match HttpClient::status_error(StatusCode::BAD_REQUEST, r#"{"detail":"Stock insuficiente"}"#) {
            ClientError::Validation(detail) => assert_eq!(detail, "Stock insuficiente"),
            other => panic!("unexpected: {other:?}"),
        }
        match HttpClient::status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom") {
            ClientError::Internal(detail) => assert_eq!(detail, "boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn token_updates_are_visible() {
        let mut c = client();
        assert!(c.token().is_none());
        c.set_token("abc");
        assert_eq!(c.token(), Some("abc"));
        c.clear_token();
        assert!(c.token().is_none());
    }
}
