//! The portal document: the entire persisted application state.

use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountId, EmailAddress, PasswordHash, Role};
use crate::domain::department::{Department, DepartmentId};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::request::{RequestId, SupplyRequest};

/// Email of the seeded administrator account.
pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";
/// Password of the seeded administrator account.
pub const SEED_ADMIN_PASSWORD: &str = "Password123!";

/// Whole persisted state blob, replaced atomically on every save.
///
/// Serialises with camelCase keys under a single storage key. Unknown or
/// missing collections default to empty so older documents stay loadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalDocument {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub requests: Vec<SupplyRequest>,
}

impl PortalDocument {
    /// Default data installed when storage is absent or malformed: a single
    /// verified administrator account and no other entities.
    pub fn seed() -> Self {
        let email = EmailAddress::parse(SEED_ADMIN_EMAIL)
            .unwrap_or_else(|error| panic!("seed admin email failed validation: {error}"));
        Self {
            accounts: vec![Account {
                id: AccountId::random(),
                first_name: "Admin".to_owned(),
                last_name: "User".to_owned(),
                email,
                password: PasswordHash::derive(SEED_ADMIN_PASSWORD),
                verified: true,
                role: Role::Admin,
            }],
            departments: Vec::new(),
            employees: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Look up an account by id.
    pub fn account_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Look up an account by its normalised email.
    pub fn account_by_email(&self, email: &EmailAddress) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.email == email)
    }

    /// Look up a department by id.
    pub fn department_by_id(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.iter().find(|department| department.id == id)
    }

    /// Look up an employee by id.
    pub fn employee_by_id(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    /// Look up a request by id.
    pub fn request_by_id(&self, id: RequestId) -> Option<&SupplyRequest> {
        self.requests.iter().find(|request| request.id == id)
    }

    /// Whether any employee references the given department.
    pub fn department_in_use(&self, id: DepartmentId) -> bool {
        self.employees
            .iter()
            .any(|employee| employee.department_id == id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn seed_contains_one_verified_admin() {
        let document = PortalDocument::seed();
        assert_eq!(document.accounts.len(), 1);
        let admin = document.accounts.first().expect("seed admin");
        assert_eq!(admin.email.as_str(), SEED_ADMIN_EMAIL);
        assert!(admin.verified);
        assert!(admin.role.is_admin());
        assert!(admin.password.verify(SEED_ADMIN_PASSWORD));
        assert!(document.departments.is_empty());
        assert!(document.employees.is_empty());
        assert!(document.requests.is_empty());
    }

    #[test]
    fn document_serde_round_trip_is_identical() {
        let document = PortalDocument::seed();
        let json = serde_json::to_string(&document).expect("serialise document");
        let restored: PortalDocument = serde_json::from_str(&json).expect("deserialise document");
        assert_eq!(restored, document);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let document: PortalDocument =
            serde_json::from_str(r#"{"accounts":[]}"#).expect("partial document loads");
        assert!(document.requests.is_empty());
    }
}
