//! Domain store: mutation operations over the portal document.
//!
//! Every mutation validates fully before touching the document, applies its
//! whole effect in memory, and then persists the entire document. A failed
//! operation leaves the document unchanged; referential integrity between
//! accounts, employees, and requests is maintained by cascades documented on
//! each operation.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::account::{
    Account, AccountId, EmailAddress, PasswordHash, PasswordInput, Role, MIN_PASSWORD_LEN,
};
use crate::domain::department::{Department, DepartmentId};
use crate::domain::document::PortalDocument;
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::error::Error;
use crate::domain::ports::KeyValueStore;
use crate::domain::request::{RequestId, RequestItem, RequestKind, RequestStatus, SupplyRequest};
use crate::domain::storage::PortalStorage;
use crate::domain::DomainResult;

/// Self-registration payload. Registration always produces an unverified
/// `user`-role account.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: PasswordInput,
}

/// Admin account create/edit payload. `editing` is carried separately so no
/// shared "currently editing" slot exists.
#[derive(Debug, Clone)]
pub struct AccountForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: PasswordInput,
    pub role: Role,
    pub verified: bool,
}

/// Department create/edit payload.
#[derive(Debug, Clone)]
pub struct DepartmentForm {
    pub name: String,
    pub description: String,
}

/// Employee create/edit payload. The account is referenced by email and
/// resolved against existing accounts; the department by id.
#[derive(Debug, Clone)]
pub struct EmployeeForm {
    pub account_email: String,
    pub employee_code: String,
    pub department_id: DepartmentId,
    pub position: String,
    pub hire_date: NaiveDate,
}

/// One line item of a request submission.
#[derive(Debug, Clone)]
pub struct RequestItemForm {
    pub name: String,
    pub quantity: u32,
}

/// Request submission payload.
#[derive(Debug, Clone)]
pub struct RequestForm {
    pub kind: RequestKind,
    pub items: Vec<RequestItemForm>,
}

/// Admin verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    fn status(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// Result of an account upsert, telling the caller whether the session must
/// be re-established (self-edit) and whether a cascade ran.
#[derive(Debug, Clone)]
pub struct AccountUpsertOutcome {
    pub account: Account,
    pub email_changed: bool,
}

/// The in-memory document plus the persistence handle and clock.
///
/// Operations are synchronous and run to completion; each mutation observes
/// a fully up-to-date document and persists before returning.
pub struct PortalStore<S> {
    storage: PortalStorage<S>,
    document: PortalDocument,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> PortalStore<S> {
    /// Load (or seed) the persisted document and take ownership of it.
    pub fn open(storage: PortalStorage<S>, clock: Arc<dyn Clock>) -> Self {
        let document = storage.load_or_seed();
        Self {
            storage,
            document,
            clock,
        }
    }

    /// Read access to the owned document.
    pub fn document(&self) -> &PortalDocument {
        &self.document
    }

    /// Register a new account. Inserts an unverified `user`-role account and
    /// records its email as pending verification.
    pub fn register(&mut self, form: RegisterForm) -> DomainResult<Account> {
        let mut fields = Map::new();
        require_field(&mut fields, "firstName", &form.first_name);
        require_field(&mut fields, "lastName", &form.last_name);
        let email = parse_email_field(&mut fields, &form.email);
        check_password_field(&mut fields, &form.password);
        let Some(email) = passed_validation(fields, email)? else {
            return Err(Error::internal("validation produced no email"));
        };
        self.ensure_email_unique(&email, None)?;

        let account = Account {
            id: AccountId::random(),
            first_name: form.first_name.trim().to_owned(),
            last_name: form.last_name.trim().to_owned(),
            email,
            password: PasswordHash::derive(&form.password),
            verified: false,
            role: Role::User,
        };
        self.document.accounts.push(account.clone());
        self.storage.set_pending_verification(&account.email);
        self.storage.save(&self.document);
        info!(email = %account.email, "account registered");
        Ok(account)
    }

    /// Verify the account recorded as pending verification, then clear the
    /// marker.
    pub fn verify_pending(&mut self) -> DomainResult<Account> {
        let Some(raw) = self.storage.pending_verification() else {
            return Err(Error::not_found("no pending verification"));
        };
        let email =
            EmailAddress::parse(&raw).map_err(|_| Error::not_found("account not found"))?;
        let Some(account) = self
            .document
            .accounts
            .iter_mut()
            .find(|account| account.email == email)
        else {
            return Err(Error::not_found("account not found"));
        };
        account.verified = true;
        let verified = account.clone();
        self.storage.clear_pending_verification();
        self.storage.save(&self.document);
        info!(email = %verified.email, "account verified");
        Ok(verified)
    }

    /// Insert or update an account. On an email change the denormalised
    /// copies cascade: every employee referencing this account id and every
    /// request referencing the old email are rewritten.
    pub fn upsert_account(
        &mut self,
        editing: Option<AccountId>,
        form: AccountForm,
    ) -> DomainResult<AccountUpsertOutcome> {
        let mut fields = Map::new();
        require_field(&mut fields, "firstName", &form.first_name);
        require_field(&mut fields, "lastName", &form.last_name);
        let email = parse_email_field(&mut fields, &form.email);
        check_password_field(&mut fields, &form.password);
        let Some(email) = passed_validation(fields, email)? else {
            return Err(Error::internal("validation produced no email"));
        };
        self.ensure_email_unique(&email, editing)?;

        let outcome = match editing {
            Some(id) => {
                let Some(account) = self
                    .document
                    .accounts
                    .iter_mut()
                    .find(|account| account.id == id)
                else {
                    return Err(Error::not_found("account not found"));
                };
                let old_email = account.email.clone();
                account.first_name = form.first_name.trim().to_owned();
                account.last_name = form.last_name.trim().to_owned();
                account.email = email.clone();
                account.password = PasswordHash::derive(&form.password);
                account.role = form.role;
                account.verified = form.verified;
                let snapshot = account.clone();
                let email_changed = old_email != email;
                if email_changed {
                    self.cascade_email_change(id, &old_email, &email);
                }
                AccountUpsertOutcome {
                    account: snapshot,
                    email_changed,
                }
            }
            None => {
                let account = Account {
                    id: AccountId::random(),
                    first_name: form.first_name.trim().to_owned(),
                    last_name: form.last_name.trim().to_owned(),
                    email,
                    password: PasswordHash::derive(&form.password),
                    verified: form.verified,
                    role: form.role,
                };
                self.document.accounts.push(account.clone());
                AccountUpsertOutcome {
                    account,
                    email_changed: false,
                }
            }
        };
        self.storage.save(&self.document);
        info!(email = %outcome.account.email, "account saved");
        Ok(outcome)
    }

    /// Overwrite an account's credential hash.
    pub fn reset_password(
        &mut self,
        id: AccountId,
        new_password: &PasswordInput,
    ) -> DomainResult<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(Error::invalid_request(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let Some(account) = self
            .document
            .accounts
            .iter_mut()
            .find(|account| account.id == id)
        else {
            return Err(Error::not_found("account not found"));
        };
        account.password = PasswordHash::derive(new_password);
        let email = account.email.clone();
        self.storage.save(&self.document);
        info!(%email, "password reset");
        Ok(())
    }

    /// Delete an account and cascade-delete the employees referencing its id
    /// and the requests referencing its email. Deleting the caller's own
    /// account is refused for any role.
    pub fn delete_account(&mut self, id: AccountId, caller: AccountId) -> DomainResult<()> {
        if id == caller {
            return Err(Error::conflict("cannot delete your own account"));
        }
        let Some(position) = self
            .document
            .accounts
            .iter()
            .position(|account| account.id == id)
        else {
            return Err(Error::not_found("account not found"));
        };
        let removed = self.document.accounts.remove(position);
        self.document
            .employees
            .retain(|employee| employee.account_id != id);
        self.document
            .requests
            .retain(|request| request.employee_email != removed.email);
        self.storage.save(&self.document);
        info!(email = %removed.email, "account deleted");
        Ok(())
    }

    /// Insert or update a department.
    pub fn upsert_department(
        &mut self,
        editing: Option<DepartmentId>,
        form: DepartmentForm,
    ) -> DomainResult<Department> {
        if form.name.trim().is_empty() {
            return Err(Error::invalid_request("validation failed").with_details(
                Value::Object(Map::from_iter([(
                    "name".to_owned(),
                    Value::String("must not be empty".to_owned()),
                )])),
            ));
        }
        let department = match editing {
            Some(id) => {
                let Some(department) = self
                    .document
                    .departments
                    .iter_mut()
                    .find(|department| department.id == id)
                else {
                    return Err(Error::not_found("department not found"));
                };
                department.name = form.name.trim().to_owned();
                department.description = form.description.trim().to_owned();
                department.clone()
            }
            None => {
                let department = Department {
                    id: DepartmentId::random(),
                    name: form.name.trim().to_owned(),
                    description: form.description.trim().to_owned(),
                };
                self.document.departments.push(department.clone());
                department
            }
        };
        self.storage.save(&self.document);
        info!(name = %department.name, "department saved");
        Ok(department)
    }

    /// Delete a department, refused while any employee references it.
    pub fn delete_department(&mut self, id: DepartmentId) -> DomainResult<()> {
        if self.document.department_in_use(id) {
            return Err(Error::conflict(
                "department is in use by one or more employees",
            ));
        }
        let Some(position) = self
            .document
            .departments
            .iter()
            .position(|department| department.id == id)
        else {
            return Err(Error::not_found("department not found"));
        };
        let removed = self.document.departments.remove(position);
        self.storage.save(&self.document);
        info!(name = %removed.name, "department deleted");
        Ok(())
    }

    /// Insert or update an employee. The referenced account email must
    /// resolve to an existing account and the department id to an existing
    /// department; the stored email is denormalised from the resolved
    /// account, never taken verbatim from the form.
    pub fn upsert_employee(
        &mut self,
        editing: Option<EmployeeId>,
        form: EmployeeForm,
    ) -> DomainResult<Employee> {
        let mut fields = Map::new();
        require_field(&mut fields, "employeeCode", &form.employee_code);
        require_field(&mut fields, "position", &form.position);
        if !fields.is_empty() {
            return Err(
                Error::invalid_request("validation failed").with_details(Value::Object(fields))
            );
        }
        let email = EmailAddress::parse(&form.account_email)
            .map_err(|_| Error::not_found("unknown account"))?;
        let Some(account) = self.document.account_by_email(&email) else {
            return Err(Error::not_found("unknown account"));
        };
        let (account_id, user_email) = (account.id, account.email.clone());
        if self.document.department_by_id(form.department_id).is_none() {
            return Err(Error::not_found("unknown department"));
        }

        let employee = match editing {
            Some(id) => {
                let Some(employee) = self
                    .document
                    .employees
                    .iter_mut()
                    .find(|employee| employee.id == id)
                else {
                    return Err(Error::not_found("employee not found"));
                };
                employee.employee_code = form.employee_code.trim().to_owned();
                employee.account_id = account_id;
                employee.user_email = user_email;
                employee.department_id = form.department_id;
                employee.position = form.position.trim().to_owned();
                employee.hire_date = form.hire_date;
                employee.clone()
            }
            None => {
                let employee = Employee {
                    id: EmployeeId::random(),
                    employee_code: form.employee_code.trim().to_owned(),
                    account_id,
                    user_email,
                    department_id: form.department_id,
                    position: form.position.trim().to_owned(),
                    hire_date: form.hire_date,
                };
                self.document.employees.push(employee.clone());
                employee
            }
        };
        self.storage.save(&self.document);
        info!(code = %employee.employee_code, "employee saved");
        Ok(employee)
    }

    /// Remove an employee. Removing an unknown id is a no-op.
    pub fn delete_employee(&mut self, id: EmployeeId) {
        self.document.employees.retain(|employee| employee.id != id);
        self.storage.save(&self.document);
        info!(%id, "employee deleted");
    }

    /// Submit a supply request on behalf of the caller. Invalid line items
    /// are dropped; the submission fails only when no valid item remains.
    pub fn submit_request(
        &mut self,
        caller: &Account,
        form: RequestForm,
    ) -> DomainResult<SupplyRequest> {
        let items: Vec<RequestItem> = form
            .items
            .into_iter()
            .filter_map(|item| RequestItem::new(item.name, item.quantity).ok())
            .collect();
        if items.is_empty() {
            return Err(Error::invalid_request("no valid items"));
        }
        let request = SupplyRequest {
            id: RequestId::random(),
            employee_email: caller.email.clone(),
            kind: form.kind,
            items,
            status: RequestStatus::Pending,
            submitted_at: self.clock.utc(),
        };
        self.document.requests.push(request.clone());
        self.storage.save(&self.document);
        info!(email = %request.employee_email, kind = %request.kind, "request submitted");
        Ok(request)
    }

    /// Admin-only terminal transition for a pending request.
    pub fn review_request(
        &mut self,
        caller: &Account,
        id: RequestId,
        decision: ReviewDecision,
    ) -> DomainResult<SupplyRequest> {
        if !caller.role.is_admin() {
            return Err(Error::forbidden("only administrators can review requests"));
        }
        let Some(request) = self
            .document
            .requests
            .iter_mut()
            .find(|request| request.id == id)
        else {
            return Err(Error::not_found("request not found"));
        };
        if request.status != RequestStatus::Pending {
            return Err(Error::conflict("request has already been reviewed"));
        }
        request.status = decision.status();
        let reviewed = request.clone();
        self.storage.save(&self.document);
        info!(%id, status = %reviewed.status, "request reviewed");
        Ok(reviewed)
    }

    fn ensure_email_unique(
        &self,
        email: &EmailAddress,
        editing: Option<AccountId>,
    ) -> DomainResult<()> {
        let taken = self
            .document
            .accounts
            .iter()
            .any(|account| &account.email == email && Some(account.id) != editing);
        if taken {
            return Err(Error::conflict("email already registered"));
        }
        Ok(())
    }

    fn cascade_email_change(
        &mut self,
        account_id: AccountId,
        old_email: &EmailAddress,
        new_email: &EmailAddress,
    ) {
        for employee in &mut self.document.employees {
            if employee.account_id == account_id {
                employee.user_email = new_email.clone();
            }
        }
        for request in &mut self.document.requests {
            if &request.employee_email == old_email {
                request.employee_email = new_email.clone();
            }
        }
        info!(%old_email, %new_email, "denormalised emails cascaded");
    }
}

fn require_field(fields: &mut Map<String, Value>, name: &str, value: &str) {
    if value.trim().is_empty() {
        fields.insert(
            name.to_owned(),
            Value::String("must not be empty".to_owned()),
        );
    }
}

fn parse_email_field(fields: &mut Map<String, Value>, raw: &str) -> Option<EmailAddress> {
    match EmailAddress::parse(raw) {
        Ok(email) => Some(email),
        Err(error) => {
            fields.insert("email".to_owned(), Value::String(error.to_string()));
            None
        }
    }
}

fn check_password_field(fields: &mut Map<String, Value>, password: &str) {
    if password.len() < MIN_PASSWORD_LEN {
        fields.insert(
            "password".to_owned(),
            Value::String(format!(
                "must be at least {MIN_PASSWORD_LEN} characters"
            )),
        );
    }
}

fn passed_validation(
    fields: Map<String, Value>,
    email: Option<EmailAddress>,
) -> DomainResult<Option<EmailAddress>> {
    if fields.is_empty() {
        Ok(email)
    } else {
        Err(Error::invalid_request("validation failed").with_details(Value::Object(fields)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::outbound::persistence::MemoryKeyValueStore;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).single().expect("valid timestamp")
    }

    fn store() -> PortalStore<MemoryKeyValueStore> {
        let storage = PortalStorage::new(Arc::new(MemoryKeyValueStore::new()));
        PortalStore::open(
            storage,
            Arc::new(FixtureClock {
                utc_now: fixture_timestamp(),
            }),
        )
    }

    fn register_form(email: &str) -> RegisterForm {
        RegisterForm {
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: email.to_owned(),
            password: "secret1".to_owned().into(),
        }
    }

    fn account_form(email: &str, role: Role) -> AccountForm {
        AccountForm {
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: email.to_owned(),
            password: "secret1".to_owned().into(),
            role,
            verified: true,
        }
    }

    fn department_form(name: &str) -> DepartmentForm {
        DepartmentForm {
            name: name.to_owned(),
            description: String::new(),
        }
    }

    fn employee_form(email: &str, department_id: DepartmentId) -> EmployeeForm {
        EmployeeForm {
            account_email: email.to_owned(),
            employee_code: "E-001".to_owned(),
            department_id,
            position: "Engineer".to_owned(),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        }
    }

    #[test]
    fn registration_reports_per_field_errors() {
        let mut store = store();
        let form = RegisterForm {
            first_name: "  ".to_owned(),
            last_name: String::new(),
            email: "not-an-email".to_owned(),
            password: "short".to_owned().into(),
        };
        let error = store.register(form).expect_err("invalid registration");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("field details");
        for field in ["firstName", "lastName", "email", "password"] {
            assert!(details.get(field).is_some(), "missing detail for {field}");
        }
        // Nothing was inserted.
        assert_eq!(store.document().accounts.len(), 1);
    }

    #[test]
    fn registration_inserts_unverified_user_and_records_pending_marker() {
        let mut store = store();
        let account = store
            .register(register_form("Ann@X.com"))
            .expect("registration succeeds");
        assert!(!account.verified);
        assert_eq!(account.role, Role::User);
        assert_eq!(account.email.as_str(), "ann@x.com");
        assert_eq!(
            store.storage.pending_verification().as_deref(),
            Some("ann@x.com")
        );
    }

    #[rstest]
    #[case("dup@x.com", "dup@x.com")]
    #[case("dup@x.com", "DUP@X.com")]
    fn duplicate_emails_are_rejected_case_insensitively(
        #[case] first: &str,
        #[case] second: &str,
    ) {
        let mut store = store();
        store.register(register_form(first)).expect("first insert");
        let error = store
            .register(register_form(second))
            .expect_err("duplicate must fail");
        assert_eq!(error.code(), ErrorCode::Conflict);
        let matching = store
            .document()
            .accounts
            .iter()
            .filter(|account| account.email.as_str() == "dup@x.com")
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn verify_pending_flips_the_flag_and_clears_the_marker() {
        let mut store = store();
        store.register(register_form("ann@x.com")).expect("register");
        let verified = store.verify_pending().expect("verification succeeds");
        assert!(verified.verified);
        assert_eq!(store.storage.pending_verification(), None);
        let again = store.verify_pending().expect_err("marker cleared");
        assert_eq!(again.code(), ErrorCode::NotFound);
    }

    #[test]
    fn email_change_cascades_to_employees_and_requests() {
        let mut store = store();
        let outcome = store
            .upsert_account(None, account_form("old@x.com", Role::User))
            .expect("create account");
        let account = outcome.account;
        let department = store
            .upsert_department(None, department_form("Logistics"))
            .expect("create department");
        store
            .upsert_employee(None, employee_form("old@x.com", department.id))
            .expect("create employee");
        store
            .submit_request(
                &account,
                RequestForm {
                    kind: RequestKind::Equipment,
                    items: vec![RequestItemForm {
                        name: "Laptop".to_owned(),
                        quantity: 1,
                    }],
                },
            )
            .expect("submit request");

        let outcome = store
            .upsert_account(Some(account.id), account_form("new@x.com", Role::User))
            .expect("email change");
        assert!(outcome.email_changed);
        assert!(store
            .document()
            .employees
            .iter()
            .all(|employee| employee.user_email.as_str() == "new@x.com"));
        assert!(store
            .document()
            .requests
            .iter()
            .all(|request| request.employee_email.as_str() == "new@x.com"));
    }

    #[test]
    fn delete_account_cascades_and_protects_self() {
        let mut store = store();
        let target = store
            .upsert_account(None, account_form("worker@x.com", Role::User))
            .expect("create account")
            .account;
        let department = store
            .upsert_department(None, department_form("Stores"))
            .expect("create department");
        store
            .upsert_employee(None, employee_form("worker@x.com", department.id))
            .expect("create employee");
        store
            .submit_request(
                &target,
                RequestForm {
                    kind: RequestKind::Other,
                    items: vec![RequestItemForm {
                        name: "Chair".to_owned(),
                        quantity: 1,
                    }],
                },
            )
            .expect("submit request");

        let self_delete = store
            .delete_account(target.id, target.id)
            .expect_err("self delete refused");
        assert_eq!(self_delete.code(), ErrorCode::Conflict);

        let admin = store.document().accounts[0].id;
        store.delete_account(target.id, admin).expect("delete");
        assert!(store.document().account_by_id(target.id).is_none());
        assert!(store.document().employees.is_empty());
        assert!(store.document().requests.is_empty());
    }

    #[test]
    fn department_delete_is_blocked_while_referenced() {
        let mut store = store();
        store
            .upsert_account(None, account_form("worker@x.com", Role::User))
            .expect("create account");
        let department = store
            .upsert_department(None, department_form("Ops"))
            .expect("create department");
        store
            .upsert_employee(None, employee_form("worker@x.com", department.id))
            .expect("create employee");

        let blocked = store
            .delete_department(department.id)
            .expect_err("delete while referenced");
        assert_eq!(blocked.code(), ErrorCode::Conflict);
        assert_eq!(store.document().departments.len(), 1);

        let employee = store.document().employees[0].id;
        store.delete_employee(employee);
        store
            .delete_department(department.id)
            .expect("delete once unreferenced");
        assert!(store.document().departments.is_empty());
    }

    #[test]
    fn employee_upsert_requires_existing_references() {
        let mut store = store();
        let unknown_department = store
            .upsert_employee(None, employee_form("admin@example.com", DepartmentId::random()))
            .expect_err("unknown department");
        assert_eq!(unknown_department.code(), ErrorCode::NotFound);
        assert_eq!(unknown_department.message(), "unknown department");
        assert!(store.document().employees.is_empty());

        let department = store
            .upsert_department(None, department_form("Ops"))
            .expect("create department");
        let unknown_account = store
            .upsert_employee(None, employee_form("ghost@x.com", department.id))
            .expect_err("unknown account");
        assert_eq!(unknown_account.message(), "unknown account");
        assert!(store.document().employees.is_empty());
    }

    #[test]
    fn submitted_request_uses_the_injected_clock_and_drops_invalid_items() {
        let mut store = store();
        let caller = store
            .upsert_account(None, account_form("ann@x.com", Role::User))
            .expect("create account")
            .account;
        let request = store
            .submit_request(
                &caller,
                RequestForm {
                    kind: RequestKind::Equipment,
                    items: vec![
                        RequestItemForm {
                            name: String::new(),
                            quantity: 3,
                        },
                        RequestItemForm {
                            name: "Laptop".to_owned(),
                            quantity: 1,
                        },
                        RequestItemForm {
                            name: "Mouse".to_owned(),
                            quantity: 0,
                        },
                    ],
                },
            )
            .expect("submit request");
        assert_eq!(request.submitted_at, fixture_timestamp());
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].name(), "Laptop");
    }

    #[test]
    fn request_with_no_valid_items_is_rejected() {
        let mut store = store();
        let caller = store
            .upsert_account(None, account_form("ann@x.com", Role::User))
            .expect("create account")
            .account;
        let error = store
            .submit_request(
                &caller,
                RequestForm {
                    kind: RequestKind::Leave,
                    items: vec![RequestItemForm {
                        name: "  ".to_owned(),
                        quantity: 2,
                    }],
                },
            )
            .expect_err("no valid items");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(store.document().requests.is_empty());
    }

    #[test]
    fn review_is_admin_only_and_terminal() {
        let mut store = store();
        let admin = store.document().accounts[0].clone();
        let user = store
            .upsert_account(None, account_form("ann@x.com", Role::User))
            .expect("create account")
            .account;
        let request = store
            .submit_request(
                &user,
                RequestForm {
                    kind: RequestKind::Resources,
                    items: vec![RequestItemForm {
                        name: "Desk".to_owned(),
                        quantity: 1,
                    }],
                },
            )
            .expect("submit request");

        let forbidden = store
            .review_request(&user, request.id, ReviewDecision::Approve)
            .expect_err("non-admin review");
        assert_eq!(forbidden.code(), ErrorCode::Forbidden);

        let approved = store
            .review_request(&admin, request.id, ReviewDecision::Approve)
            .expect("admin review");
        assert_eq!(approved.status, RequestStatus::Approved);

        let repeat = store
            .review_request(&admin, request.id, ReviewDecision::Reject)
            .expect_err("already reviewed");
        assert_eq!(repeat.code(), ErrorCode::Conflict);
    }

    #[test]
    fn failed_mutations_leave_the_document_unchanged() {
        let mut store = store();
        let before = store.document().clone();
        store
            .register(register_form("not-an-email"))
            .expect_err("invalid registration");
        store
            .delete_department(DepartmentId::random())
            .expect_err("unknown department");
        assert_eq!(store.document(), &before);
    }
}
