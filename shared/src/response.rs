//! Wire envelopes
//!
//! The backend has no uniform response format: list routes answer with a
//! bare array, `{"productos": [...]}` or `{"data": [...]}`, and error
//! bodies usually carry a `detail` field. These types absorb all observed
//! shapes so the rest of the workspace never sees them.

use serde::Deserialize;
use serde_json::Value;

/// Any of the backend's list response shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Products {
        #[serde(rename = "productos")]
        products: Vec<Value>,
    },
    Data {
        data: Vec<Value>,
    },
}

impl ListEnvelope {
    /// Unwrap the envelope into its raw rows.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Bare(items) => items,
            Self::Products { products } => products,
            Self::Data { data } => data,
        }
    }
}

/// Best-effort decode of an error response body.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract the most specific error text from a raw body, falling back
    /// to the body itself when it is not the expected JSON shape.
    pub fn detail_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.detail.or(parsed.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_accepts_all_three_shapes() {
        let bare: ListEnvelope = serde_json::from_str(r#"[{"id":1}]"#).unwrap();
        let products: ListEnvelope = serde_json::from_str(r#"{"productos":[{"id":1}]}"#).unwrap();
        let data: ListEnvelope = serde_json::from_str(r#"{"data":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(bare.into_items().len(), 1);
        assert_eq!(products.into_items().len(), 1);
        assert_eq!(data.into_items().len(), 2);
    }

    #[test]
    fn error_body_prefers_detail() {
        assert_eq!(
            ErrorBody::detail_from(r#"{"detail":"Stock insuficiente"}"#).as_deref(),
            Some("Stock insuficiente")
        );
        assert_eq!(
            ErrorBody::detail_from(r#"{"message":"boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(ErrorBody::detail_from("not json"), None);
    }
}
