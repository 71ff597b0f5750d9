//! Employee records linking accounts to departments.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::{AccountId, EmailAddress};
use crate::domain::department::DepartmentId;

/// Stable employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Staff record created and edited only through the admin surface.
///
/// ## Invariants
/// - `account_id` and `department_id` resolve to existing entities at
///   create/edit time; the store enforces both.
/// - `user_email` is a denormalised copy of the referenced account's email
///   kept in sync by the account-edit cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_code: String,
    pub account_id: AccountId,
    pub user_email: EmailAddress,
    pub department_id: DepartmentId,
    pub position: String,
    pub hire_date: NaiveDate,
}
