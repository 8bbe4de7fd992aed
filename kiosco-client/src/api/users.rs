//! Users API

use crate::{normalize, ClientError, ClientResult, HttpClient};
use serde_json::Value;
use shared::models::{User, UserUpdate};
use shared::response::ListEnvelope;

impl HttpClient {
    /// List all user records (admin only; the backend enforces that).
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        let envelope: ListEnvelope = self.get("/usuarios").await?;
        Ok(normalize::users(envelope.into_items()))
    }

    /// Fetch a single user.
    pub async fn get_user(&self, id: i64) -> ClientResult<User> {
        let row: Value = self.get(&format!("/usuarios/{}", id)).await?;
        normalize::user(&row)
            .ok_or_else(|| ClientError::InvalidResponse(format!("usuario {} sin forma válida", id)))
    }

    /// Update a user record.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> ClientResult<Value> {
        self.put(&format!("/usuarios/{}", id), update).await
    }
}
