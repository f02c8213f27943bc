//! API response envelope types

use serde::{Deserialize, Serialize};

use super::pagination::PageInfo;

/// Uniform response envelope returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request was successful
    pub ok: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope with a payload
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Create a successful envelope without a payload
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            payload: None,
        }
    }

    /// Create a failure envelope
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            payload: None,
        }
    }
}

/// Payload for list endpoints: the documents plus a pagination descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedDocs<T> {
    /// Documents for the requested page
    pub docs: Vec<T>,

    /// Pagination descriptor
    pub paging: PageInfo,
}

impl<T> PagedDocs<T> {
    /// Create a paged payload from documents and the computed descriptor
    pub fn new(docs: Vec<T>, paging: PageInfo) -> Self {
        Self { docs, paging }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let env = Envelope::success("created", 42);
        assert!(env.ok);
        assert_eq!(env.message, "created");
        assert_eq!(env.payload, Some(42));
    }

    #[test]
    fn test_failure_envelope_has_no_payload() {
        let env: Envelope<()> = Envelope::failure("nope");
        assert!(!env.ok);
        assert!(env.payload.is_none());
    }

    #[test]
    fn test_failure_envelope_skips_payload_field() {
        let env: Envelope<()> = Envelope::failure("nope");
        let json = serde_json::to_string(&env).unwrap();
        assert!(!json.contains("payload"));
    }
}
