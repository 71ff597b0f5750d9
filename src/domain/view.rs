//! Pure view-model builders.
//!
//! Each function maps entity collections to render-ready rows with no
//! knowledge of any concrete UI toolkit. Rows carry display strings only;
//! the surface never sees domain entities.

use chrono::NaiveDate;

use crate::domain::account::{Account, AccountId, EmailAddress};
use crate::domain::department::DepartmentId;
use crate::domain::document::PortalDocument;
use crate::domain::employee::EmployeeId;
use crate::domain::request::{RequestId, RequestKind, RequestStatus};
use crate::domain::router::Page;

/// One row of the admin accounts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
}

/// One row of the admin departments table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub id: DepartmentId,
    pub name: String,
    pub description: String,
    pub employee_count: usize,
}

/// One row of the admin employees table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub employee_code: String,
    pub user_email: String,
    pub department: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

/// One line item of a request row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestItemRow {
    pub name: String,
    pub quantity: u32,
}

/// One row of the requests table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub id: RequestId,
    pub employee_email: String,
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub submitted: String,
    pub items: Vec<RequestItemRow>,
}

/// A department option for the employee form's select widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentOption {
    pub id: DepartmentId,
    pub name: String,
}

/// Render-ready content for one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Login,
    Register,
    VerifyEmail {
        pending_email: Option<String>,
    },
    Home {
        full_name: String,
        role: String,
    },
    Requests {
        rows: Vec<RequestRow>,
        review_enabled: bool,
    },
    Accounts {
        rows: Vec<AccountRow>,
    },
    Departments {
        rows: Vec<DepartmentRow>,
    },
    Employees {
        rows: Vec<EmployeeRow>,
        departments: Vec<DepartmentOption>,
    },
}

/// Rows for the admin accounts table.
pub fn account_rows(document: &PortalDocument) -> Vec<AccountRow> {
    document
        .accounts
        .iter()
        .map(|account| AccountRow {
            id: account.id,
            name: account.full_name(),
            email: account.email.to_string(),
            role: account.role.to_string(),
            verified: account.verified,
        })
        .collect()
}

/// Rows for the admin departments table, each with its reference count.
pub fn department_rows(document: &PortalDocument) -> Vec<DepartmentRow> {
    document
        .departments
        .iter()
        .map(|department| DepartmentRow {
            id: department.id,
            name: department.name.clone(),
            description: department.description.clone(),
            employee_count: document
                .employees
                .iter()
                .filter(|employee| employee.department_id == department.id)
                .count(),
        })
        .collect()
}

/// Rows for the admin employees table with resolved department names.
pub fn employee_rows(document: &PortalDocument) -> Vec<EmployeeRow> {
    document
        .employees
        .iter()
        .map(|employee| EmployeeRow {
            id: employee.id,
            employee_code: employee.employee_code.clone(),
            user_email: employee.user_email.to_string(),
            department: document
                .department_by_id(employee.department_id)
                .map_or_else(|| "—".to_owned(), |department| department.name.clone()),
            position: employee.position.clone(),
            hire_date: employee.hire_date,
        })
        .collect()
}

/// Rows for the caller's own requests. This is the only request read
/// available to non-admin identities.
pub fn request_rows_for(document: &PortalDocument, email: &EmailAddress) -> Vec<RequestRow> {
    request_rows_where(document, |owner| owner == email)
}

/// Rows for every request, used by the admin review surface.
pub fn request_rows_all(document: &PortalDocument) -> Vec<RequestRow> {
    request_rows_where(document, |_| true)
}

fn request_rows_where(
    document: &PortalDocument,
    mut include: impl FnMut(&EmailAddress) -> bool,
) -> Vec<RequestRow> {
    document
        .requests
        .iter()
        .filter(|request| include(&request.employee_email))
        .map(|request| RequestRow {
            id: request.id,
            employee_email: request.employee_email.to_string(),
            kind: request.kind,
            status: request.status,
            submitted: request.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            items: request
                .items
                .iter()
                .map(|item| RequestItemRow {
                    name: item.name().to_owned(),
                    quantity: item.quantity(),
                })
                .collect(),
        })
        .collect()
}

/// Build the view-model for a page.
///
/// `identity` is the session account, if any; `pending_email` is the
/// recorded pending-verification marker used by the verify page.
pub fn page_view(
    page: Page,
    document: &PortalDocument,
    identity: Option<&Account>,
    pending_email: Option<String>,
) -> PageView {
    match page {
        Page::Login => PageView::Login,
        Page::Register => PageView::Register,
        Page::VerifyEmail => PageView::VerifyEmail { pending_email },
        Page::Home => PageView::Home {
            full_name: identity.map(Account::full_name).unwrap_or_default(),
            role: identity
                .map(|account| account.role.to_string())
                .unwrap_or_default(),
        },
        Page::Requests => {
            let admin = identity.is_some_and(|account| account.role.is_admin());
            let rows = match identity {
                Some(account) if !admin => request_rows_for(document, &account.email),
                Some(_) => request_rows_all(document),
                None => Vec::new(),
            };
            PageView::Requests {
                rows,
                review_enabled: admin,
            }
        }
        Page::Accounts => PageView::Accounts {
            rows: account_rows(document),
        },
        Page::Departments => PageView::Departments {
            rows: department_rows(document),
        },
        Page::Employees => PageView::Employees {
            rows: employee_rows(document),
            departments: document
                .departments
                .iter()
                .map(|department| DepartmentOption {
                    id: department.id,
                    name: department.name.clone(),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::account::{PasswordHash, Role};
    use crate::domain::department::Department;
    use crate::domain::employee::Employee;
    use crate::domain::request::{RequestItem, SupplyRequest};
    use chrono::{TimeZone, Utc};

    fn account(email: &str, role: Role) -> Account {
        Account {
            id: AccountId::random(),
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: EmailAddress::parse(email).expect("valid email"),
            password: PasswordHash::derive("secret1"),
            verified: true,
            role,
        }
    }

    fn request_for(email: &str) -> SupplyRequest {
        SupplyRequest {
            id: RequestId::random(),
            employee_email: EmailAddress::parse(email).expect("valid email"),
            kind: RequestKind::Equipment,
            items: vec![RequestItem::new("Laptop", 1).expect("valid item")],
            status: RequestStatus::Pending,
            submitted_at: Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).single().expect("timestamp"),
        }
    }

    #[test]
    fn request_rows_are_scoped_to_the_given_email() {
        let mut document = PortalDocument::default();
        document.requests.push(request_for("ann@x.com"));
        document.requests.push(request_for("bob@x.com"));

        let ann = EmailAddress::parse("ann@x.com").expect("valid email");
        let rows = request_rows_for(&document, &ann);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_email, "ann@x.com");
        assert_eq!(request_rows_all(&document).len(), 2);
    }

    #[test]
    fn requests_page_filters_for_users_but_not_admins() {
        let mut document = PortalDocument::default();
        let user = account("ann@x.com", Role::User);
        let admin = account("boss@x.com", Role::Admin);
        document.requests.push(request_for("ann@x.com"));
        document.requests.push(request_for("bob@x.com"));

        let PageView::Requests {
            rows,
            review_enabled,
        } = page_view(Page::Requests, &document, Some(&user), None)
        else {
            panic!("expected requests view");
        };
        assert_eq!(rows.len(), 1);
        assert!(!review_enabled);

        let PageView::Requests {
            rows,
            review_enabled,
        } = page_view(Page::Requests, &document, Some(&admin), None)
        else {
            panic!("expected requests view");
        };
        assert_eq!(rows.len(), 2);
        assert!(review_enabled);
    }

    #[test]
    fn department_rows_carry_reference_counts() {
        let mut document = PortalDocument::default();
        let owner = account("ann@x.com", Role::User);
        let department = Department {
            id: DepartmentId::random(),
            name: "Ops".to_owned(),
            description: String::new(),
        };
        document.employees.push(Employee {
            id: EmployeeId::random(),
            employee_code: "E-001".to_owned(),
            account_id: owner.id,
            user_email: owner.email.clone(),
            department_id: department.id,
            position: "Engineer".to_owned(),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        });
        document.departments.push(department);
        document.accounts.push(owner);

        let rows = department_rows(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_count, 1);

        let employees = employee_rows(&document);
        assert_eq!(employees[0].department, "Ops");
    }

    #[test]
    fn home_view_reflects_the_identity() {
        let admin = account("boss@x.com", Role::Admin);
        let view = page_view(Page::Home, &PortalDocument::default(), Some(&admin), None);
        assert_eq!(
            view,
            PageView::Home {
                full_name: "Ann Lee".to_owned(),
                role: "admin".to_owned(),
            }
        );
    }
}
