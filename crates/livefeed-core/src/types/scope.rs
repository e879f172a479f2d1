//! Scope descriptors: which items a client instance should see and hold.
//!
//! A scope is the (role, partition-key) pair narrowing the item list. The
//! server already filters by scope; the client filters again, since stale
//! or out-of-scope items can arrive via a shared push channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::result::SyncResult;

/// User role, as understood by the portal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform administrator; sees every item of the role feed.
    #[serde(rename = "Admin")]
    Admin,
    /// Human-resources reviewer.
    #[serde(rename = "RH")]
    Hr,
    /// Hierarchical manager of a department.
    #[serde(rename = "Chef Hiérarchique")]
    Manager,
    /// Regular employee.
    #[serde(rename = "collaborateur")]
    Employee,
}

impl Role {
    /// The wire name used in query strings and push topics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Hr => "RH",
            Self::Manager => "Chef Hiérarchique",
            Self::Employee => "collaborateur",
        }
    }

    /// A filesystem- and key-safe slug for cache keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "rh",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The scope a synchronizer instance is bound to.
///
/// `company` is the company code partition, `service` the department, and
/// `personnel` a single-user partition. Admin scopes need no partition;
/// every other role must carry at least a company or personnel key, which
/// mirrors the backend's own precondition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Role of the consuming user.
    pub role: Role,
    /// Company code partition key.
    #[serde(default)]
    pub company: Option<String>,
    /// Department / service partition key.
    #[serde(default)]
    pub service: Option<String>,
    /// Single-user partition key.
    #[serde(default)]
    pub personnel: Option<String>,
}

impl Scope {
    /// Create a scope with only a role.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            company: None,
            service: None,
            personnel: None,
        }
    }

    /// Builder-style company partition.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Builder-style service partition.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Builder-style personnel partition.
    pub fn with_personnel(mut self, personnel: impl Into<String>) -> Self {
        self.personnel = Some(personnel.into());
        self
    }

    /// Validate the scope before any network operation.
    ///
    /// Non-admin scopes without a company or personnel partition are
    /// rejected with `MissingScope`; the backend would answer such a
    /// request with a bad-request anyway, so the operation must not
    /// contact the network at all.
    pub fn validate(&self) -> SyncResult<()> {
        if self.role != Role::Admin && self.company.is_none() && self.personnel.is_none() {
            return Err(SyncError::missing_scope(format!(
                "scope for role '{}' carries no company or personnel partition",
                self.role
            )));
        }
        Ok(())
    }

    /// Deterministic cache key for this scope.
    ///
    /// One persisted snapshot exists per key; a scope change must never
    /// read another scope's entry.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.role.slug(),
            self.company.as_deref().unwrap_or("-"),
            self.service.as_deref().unwrap_or("-"),
            self.personnel.as_deref().unwrap_or("-"),
        )
    }

    /// Push topic for this scope, in the shape the backend publishes on.
    pub fn topic(&self) -> String {
        format!(
            "notifications/{}/{}",
            self.role.as_str(),
            self.company.as_deref().unwrap_or("-"),
        )
    }

    /// Query-string pairs for REST requests.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("role", self.role.as_str().to_string())];
        if let Some(company) = &self.company {
            pairs.push(("company", company.clone()));
        }
        if let Some(service) = &self.service {
            pairs.push(("service", service.clone()));
        }
        if let Some(personnel) = &self.personnel {
            pairs.push(("personnel", personnel.clone()));
        }
        pairs
    }
}

/// The partition fields an item arrives tagged with.
///
/// All fields are optional: the server omits tags it did not partition
/// by. An item is in scope when every tag present on **both** sides
/// matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTag {
    /// Role the item was addressed to.
    #[serde(default)]
    pub role: Option<Role>,
    /// Company code the item belongs to.
    #[serde(default)]
    pub company: Option<String>,
    /// Department / service the item belongs to.
    #[serde(default)]
    pub service: Option<String>,
    /// Single recipient, if the item is user-addressed.
    #[serde(default)]
    pub personnel: Option<String>,
}

impl ScopeTag {
    /// Whether an item carrying this tag belongs to `scope`.
    ///
    /// Admin scopes accept every item. Personnel-addressed items match a
    /// personnel-partitioned scope regardless of the role tag, which is
    /// how the backend routes user-addressed notifications.
    pub fn matches(&self, scope: &Scope) -> bool {
        if scope.role == Role::Admin {
            return true;
        }
        if let (Some(personnel), Some(tagged)) = (&scope.personnel, &self.personnel) {
            return personnel == tagged;
        }
        if self.role.is_some_and(|role| role != scope.role) {
            return false;
        }
        if let (Some(company), Some(tagged)) = (&scope.company, &self.company) {
            if company != tagged {
                return false;
            }
        }
        if let (Some(service), Some(tagged)) = (&scope.service, &self.service) {
            if service != tagged {
                return false;
            }
        }
        true
    }
}
