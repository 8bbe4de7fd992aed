//! User Model

use serde::{Deserialize, Serialize};

/// User entity as rendered by the admin users screen.
///
/// The backend's list route emits `correo` for the email field; the
/// normalization adapter maps it onto `email`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
}

/// Buyer signup payload (backend wire names)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre_usuario")]
    pub username: String,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub password: String,
}

/// Update user payload (backend wire names)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "nombre_usuario", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "nombre_completo", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
