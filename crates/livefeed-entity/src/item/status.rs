//! Request processing status.
//!
//! The backend stores workflow state as single-letter codes. Those codes
//! exist only at the serialization boundary; everywhere inland the status
//! is this closed enumeration.

use serde::{Deserialize, Serialize};

/// Processing status of a request-like item.
///
/// Wire mapping: `"I"` = pending (initial), `"T"` = processed (traité),
/// `"N"` = rejected, `"O"` = approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Not yet handled by the reviewer.
    #[serde(rename = "I")]
    Pending,
    /// Handled by HR (terminal for HR-reviewed requests).
    #[serde(rename = "T")]
    Processed,
    /// Rejected by the reviewer.
    #[serde(rename = "N")]
    Rejected,
    /// Approved by the reviewer.
    #[serde(rename = "O")]
    Approved,
}

impl RequestStatus {
    /// The single-letter wire code.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Self::Pending => "I",
            Self::Processed => "T",
            Self::Rejected => "N",
            Self::Approved => "O",
        }
    }

    /// Parse a wire code. Returns `None` for unknown codes.
    pub fn from_wire(code: &str) -> Option<Self> {
        match code {
            "I" => Some(Self::Pending),
            "T" => Some(Self::Processed),
            "N" => Some(Self::Rejected),
            "O" => Some(Self::Approved),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
            Self::Approved => "approved",
        };
        write!(f, "{label}")
    }
}
