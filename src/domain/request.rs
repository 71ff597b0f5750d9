//! Self-service supply requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::EmailAddress;

/// Stable request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category of a supply request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Equipment,
    Leave,
    Resources,
    Other,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equipment => f.write_str("Equipment"),
            Self::Leave => f.write_str("Leave"),
            Self::Resources => f.write_str("Resources"),
            Self::Other => f.write_str("Other"),
        }
    }
}

/// Review state of a request. New requests start [`RequestStatus::Pending`];
/// only an admin review moves them to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Approved => f.write_str("Approved"),
            Self::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Validation errors returned by [`RequestItem::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestItemValidationError {
    EmptyName,
    ZeroQuantity,
}

impl fmt::Display for RequestItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::ZeroQuantity => write!(f, "item quantity must be greater than zero"),
        }
    }
}

impl std::error::Error for RequestItemValidationError {}

/// One line item of a supply request.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `quantity` is greater than zero.
///
/// A persisted document failing these checks is treated as malformed and
/// replaced by the seed document on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestItemDto", into = "RequestItemDto")]
pub struct RequestItem {
    name: String,
    quantity: u32,
}

impl RequestItem {
    /// Validate and construct a line item.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
    ) -> Result<Self, RequestItemValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RequestItemValidationError::EmptyName);
        }
        if quantity == 0 {
            return Err(RequestItemValidationError::ZeroQuantity);
        }
        Ok(Self { name, quantity })
    }

    /// Item name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Requested quantity, always greater than zero.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RequestItemDto {
    name: String,
    quantity: u32,
}

impl From<RequestItem> for RequestItemDto {
    fn from(value: RequestItem) -> Self {
        Self {
            name: value.name,
            quantity: value.quantity,
        }
    }
}

impl TryFrom<RequestItemDto> for RequestItem {
    type Error = RequestItemValidationError;

    fn try_from(value: RequestItemDto) -> Result<Self, Self::Error> {
        RequestItem::new(value.name, value.quantity)
    }
}

/// Supply request owned by the account whose email it carries.
///
/// Requests reference their owner by email rather than account id; the
/// account-edit cascade rewrites `employee_email` when the owning account's
/// email changes, and the account-delete cascade removes the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequest {
    pub id: RequestId,
    pub employee_email: EmailAddress,
    pub kind: RequestKind,
    pub items: Vec<RequestItem>,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
}
