//! Session state
//!
//! Holds the opaque bearer token and derives identity claims from it by
//! best-effort decoding of the payload segment. Claims are never stored
//! independently; they are recomputed from the token on demand. Nothing
//! here verifies a signature - the client-side role check is a UX
//! convenience, the backend re-checks authorization on every call.

use crate::storage::{LocalStore, StorageError, KEY_RETURN_TO, KEY_TOKEN, KEY_USER_ID};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;
use shared::util::now_secs;

// Claim names vary by issuer; first present wins.
const ID_CLAIMS: &[&str] = &["sub", "user_id", "id", "userId"];
const NAME_CLAIMS: &[&str] = &["nombre", "name", "username"];
const ROLE_CLAIMS: &[&str] = &["rol", "role"];
const ADMIN_MARKERS: &[&str] = &["administrador", "admin"];

/// Role derived from the token's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

/// Decoded (not verified) token claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub exp: Option<u64>,
}

impl Claims {
    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.exp, Some(exp) if exp < now)
    }

    /// Display name for receipts and greetings.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "Cliente".to_string())
    }
}

fn claim_string(payload: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| match payload.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode the middle segment of a bearer token. Any malformation yields
/// `None`; expiry is the caller's concern.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let payload: Value = serde_json::from_slice(&payload_bytes).ok()?;
    if !payload.is_object() {
        return None;
    }

    let role_text = claim_string(&payload, ROLE_CLAIMS);
    let admin_flag = payload.get("admin").and_then(Value::as_bool).unwrap_or(false);
    let role = match role_text.as_deref() {
        Some(role) if ADMIN_MARKERS.contains(&role) => Role::Admin,
        _ if admin_flag => Role::Admin,
        _ => Role::Customer,
    };

    Some(Claims {
        id: claim_string(&payload, ID_CLAIMS),
        name: claim_string(&payload, NAME_CLAIMS),
        role,
        exp: payload.get("exp").and_then(Value::as_u64),
    })
}

/// Session store: the token plus its derived, on-demand claims.
pub struct SessionStore {
    token: Option<String>,
}

impl SessionStore {
    /// Rebuild the session from durable storage.
    pub fn hydrate(store: &LocalStore) -> Self {
        Self {
            token: store.get(KEY_TOKEN).map(str::to_string),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a fresh token after login; the id claim is mirrored into
    /// storage for other consumers of the store.
    pub fn set_token(&mut self, store: &mut LocalStore, token: &str) -> Result<(), StorageError> {
        store.set(KEY_TOKEN, token)?;
        if let Some(claims) = decode_claims(token) {
            if let Some(id) = &claims.id {
                store.set(KEY_USER_ID, id.clone())?;
            }
        }
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Decoded claims of the current token, or `None` when there is no
    /// token, the token is malformed, or it has expired. In the last two
    /// cases the stored token is cleared (fail-fast invalidation).
    pub fn claims(&mut self, store: &mut LocalStore) -> Option<Claims> {
        let token = self.token.as_deref()?;
        match decode_claims(token) {
            Some(claims) if !claims.is_expired(now_secs()) => Some(claims),
            Some(_) => {
                tracing::info!("token expirado, sesión invalidada");
                self.clear(store);
                None
            }
            None => {
                tracing::warn!("token malformado, sesión invalidada");
                self.clear(store);
                None
            }
        }
    }

    pub fn is_authenticated(&mut self, store: &mut LocalStore) -> bool {
        self.claims(store).is_some()
    }

    pub fn is_admin(&mut self, store: &mut LocalStore) -> bool {
        matches!(self.claims(store), Some(claims) if claims.role == Role::Admin)
    }

    /// Gate a protected screen. On failure the current location is saved
    /// for the post-login return and the caller must navigate to login
    /// and stop further work.
    pub fn require_auth(&mut self, store: &mut LocalStore, current: &str) -> bool {
        if self.claims(store).is_some() {
            return true;
        }
        let _ = store.set(KEY_RETURN_TO, current);
        false
    }

    /// Consume the pending post-login return target, if any.
    pub fn take_return_target(&mut self, store: &mut LocalStore) -> Option<String> {
        let target = store.get(KEY_RETURN_TO).map(str::to_string)?;
        let _ = store.remove(KEY_RETURN_TO);
        Some(target)
    }

    /// Destroy the session: logout, expiry detection, or a 401 from any
    /// backend call.
    pub fn clear(&mut self, store: &mut LocalStore) {
        self.token = None;
        let _ = store.remove(KEY_TOKEN);
        let _ = store.remove(KEY_USER_ID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token_with_payload(payload: &Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("hdr.{}.sig", body)
    }

    fn open_store(dir: &TempDir) -> LocalStore {
        LocalStore::open(dir.path()).unwrap()
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("solo-dos.partes").is_none());
        assert!(decode_claims("a.!!!no-base64!!!.c").is_none());
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode(b"not json"));
        assert!(decode_claims(&not_json).is_none());
    }

    #[test]
    fn role_candidates_resolve_in_order() {
        let admin_es = token_with_payload(&serde_json::json!({"rol": "administrador"}));
        let admin_en = token_with_payload(&serde_json::json!({"role": "admin"}));
        let admin_flag = token_with_payload(&serde_json::json!({"admin": true}));
        let customer = token_with_payload(&serde_json::json!({"rol": "cliente"}));
        assert_eq!(decode_claims(&admin_es).unwrap().role, Role::Admin);
        assert_eq!(decode_claims(&admin_en).unwrap().role, Role::Admin);
        assert_eq!(decode_claims(&admin_flag).unwrap().role, Role::Admin);
        assert_eq!(decode_claims(&customer).unwrap().role, Role::Customer);
    }

    #[test]
    fn identity_claims_accept_numeric_ids() {
        let token = token_with_payload(&serde_json::json!({"user_id": 42, "nombre": "Ana"}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id.as_deref(), Some("42"));
        assert_eq!(claims.display_name(), "Ana");
    }

    #[test]
    fn expired_token_is_cleared_from_storage() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let expired = token_with_payload(&serde_json::json!({"rol": "cliente", "exp": 1}));

        let mut session = SessionStore::hydrate(&store);
        session.set_token(&mut store, &expired).unwrap();
        assert!(session.claims(&mut store).is_none());
        assert!(session.token().is_none());
        assert_eq!(store.get(KEY_TOKEN), None);
    }

    #[test]
    fn valid_token_round_trips_through_storage() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let exp = now_secs() + 3600;
        let token = token_with_payload(&serde_json::json!({
            "sub": "7", "nombre": "Ana", "rol": "administrador", "exp": exp
        }));

        let mut session = SessionStore::hydrate(&store);
        session.set_token(&mut store, &token).unwrap();
        assert_eq!(store.get(KEY_USER_ID), Some("7"));

        let mut rehydrated = SessionStore::hydrate(&store);
        assert!(rehydrated.is_authenticated(&mut store));
        assert!(rehydrated.is_admin(&mut store));
    }

    #[test]
    fn require_auth_saves_the_return_target() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let mut session = SessionStore::hydrate(&store);

        assert!(!session.require_auth(&mut store, "inventario"));
        assert_eq!(store.get(KEY_RETURN_TO), Some("inventario"));
        assert_eq!(session.take_return_target(&mut store).as_deref(), Some("inventario"));
        assert_eq!(store.get(KEY_RETURN_TO), None);
    }
}
