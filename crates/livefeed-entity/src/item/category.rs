//! Item category enumeration.

use serde::{Deserialize, Serialize};

/// Category of an item, for filtering and display.
///
/// The wire names are the request-kind identifiers the portal backend
/// uses in its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A plain notification with no workflow attached.
    #[serde(rename = "notification")]
    Notification,
    /// A leave request.
    #[serde(rename = "conge")]
    Leave,
    /// A training request.
    #[serde(rename = "formation")]
    Training,
    /// A document request.
    #[serde(rename = "document")]
    Document,
    /// An exit/absence authorization request.
    #[serde(rename = "autorisation")]
    Authorization,
    /// An advance-payment request.
    #[serde(rename = "pre-avance")]
    AdvancePayment,
}

impl Category {
    /// Return the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Leave => "conge",
            Self::Training => "formation",
            Self::Document => "document",
            Self::Authorization => "autorisation",
            Self::AdvancePayment => "pre-avance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
