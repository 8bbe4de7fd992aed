//! Auth API: login and buyer signup

use crate::{ClientResult, HttpClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::RegisterRequest;

/// Login response data. The backend only ever returns the bearer token;
/// identity comes from decoding its claims client-side.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl HttpClient {
    /// Login with username and password (wire names per the backend).
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            nombre_usuario: &'a str,
            #[serde(rename = "contraseña")]
            password: &'a str,
        }

        self.post("/login", &LoginRequest { nombre_usuario: username, password })
            .await
    }

    /// Register a new buyer account.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Value> {
        self.post("/registro-comprador", request).await
    }
}
