//! Application shell: owns the store, the session, and the render surface.
//!
//! Event flow: a surface event enters here, becomes a store mutation, the
//! store persists the document, and the active page is re-rendered. The
//! router runs on every navigation, consulting the session flags before any
//! page is shown.

use std::sync::Arc;

use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::account::AccountId;
use crate::domain::department::DepartmentId;
use crate::domain::employee::EmployeeId;
use crate::domain::error::{Error, ErrorCode};
use crate::domain::ports::{KeyValueStore, RenderSurface, Severity};
use crate::domain::request::RequestId;
use crate::domain::router::{self, Location, Page, Resolution};
use crate::domain::session::{LoginCredentials, SessionManager, LOGIN_FAILED_MESSAGE};
use crate::domain::storage::PortalStorage;
use crate::domain::store::{
    AccountForm, DepartmentForm, EmployeeForm, PortalStore, RegisterForm, RequestForm,
    ReviewDecision,
};
use crate::domain::view;

/// The portal application: one instance per rendering surface.
pub struct PortalApp<S, R> {
    storage: PortalStorage<S>,
    store: PortalStore<S>,
    session: SessionManager<S>,
    surface: R,
    current: Resolution,
}

impl<S: KeyValueStore, R: RenderSurface> PortalApp<S, R> {
    /// Load persisted state, restore any token-backed session, and show the
    /// initial page.
    pub fn bootstrap(backend: Arc<S>, clock: Arc<dyn Clock>, surface: R) -> Self {
        let storage = PortalStorage::new(backend);
        let store = PortalStore::open(storage.clone(), clock);
        let mut session = SessionManager::new(storage.clone());
        session.restore(store.document());
        let current = router::resolve(&Location::default_location(), session.flags());
        let mut app = Self {
            storage,
            store,
            session,
            surface,
            current,
        };
        let flags = app.session.flags();
        app.surface.apply_session_flags(flags);
        app.activate();
        app
    }

    /// The location currently shown, after any guard redirects.
    pub fn location(&self) -> &Location {
        &self.current.location
    }

    /// The page currently shown.
    pub fn page(&self) -> Page {
        self.current.page
    }

    /// Read access to the render surface, mainly for assertions in tests.
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Navigate to a location. Guard redirects apply before anything is
    /// shown.
    pub fn navigate(&mut self, requested: Location) {
        self.current = router::resolve(&requested, self.session.flags());
        self.activate();
    }

    /// Location change not initiated by the app (back/forward). Resolves
    /// exactly like [`PortalApp::navigate`].
    pub fn handle_location_change(&mut self, location: Location) {
        self.navigate(location);
    }

    /// Registration form submission.
    pub fn submit_register(&mut self, form: RegisterForm) {
        match self.store.register(form) {
            Ok(account) => {
                self.surface.notify(
                    Severity::Success,
                    &format!("account created for {}; verify the email to log in", account.email),
                );
                self.navigate(Location::new("#/verify-email"));
            }
            Err(error) => self.report(&error),
        }
    }

    /// Verify button on the verify-email page.
    pub fn click_verify(&mut self) {
        match self.store.verify_pending() {
            Ok(account) => {
                self.surface.notify(
                    Severity::Success,
                    &format!("{} verified; you can now log in", account.email),
                );
                self.navigate(Location::default_location());
            }
            Err(error) => self.report(&error),
        }
    }

    /// Login form submission.
    pub fn submit_login(&mut self, email: &str, password: &str) {
        let Ok(credentials) = LoginCredentials::try_from_parts(email, password) else {
            self.surface.notify(Severity::Danger, LOGIN_FAILED_MESSAGE);
            return;
        };
        match self.session.login(self.store.document(), &credentials) {
            Ok(account) => {
                let flags = self.session.flags();
                self.surface.apply_session_flags(flags);
                self.surface
                    .notify(Severity::Success, &format!("welcome, {}", account.full_name()));
                self.navigate(Location::landing());
            }
            Err(error) => self.report(&error),
        }
    }

    /// Logout button.
    pub fn click_logout(&mut self) {
        let flags = self.session.clear();
        self.surface.apply_session_flags(flags);
        self.navigate(Location::default_location());
    }

    /// Open the account form prefilled for editing. The returned pair is the
    /// explicit edit session handed back to [`PortalApp::submit_account`];
    /// the password field always starts blank and must be re-entered.
    pub fn open_account_form(&self, id: AccountId) -> Option<(AccountId, AccountForm)> {
        self.store.document().account_by_id(id).map(|account| {
            (
                id,
                AccountForm {
                    first_name: account.first_name.clone(),
                    last_name: account.last_name.clone(),
                    email: account.email.to_string(),
                    password: Zeroizing::new(String::new()),
                    role: account.role,
                    verified: account.verified,
                },
            )
        })
    }

    /// Account form submission; `editing` is `None` for a create.
    pub fn submit_account(&mut self, editing: Option<AccountId>, form: AccountForm) {
        match self.store.upsert_account(editing, form) {
            Ok(outcome) => {
                let edited_self = self
                    .session
                    .current_identity()
                    .is_some_and(|identity| identity.id == outcome.account.id);
                if edited_self {
                    let flags = self.session.establish(outcome.account.clone());
                    self.surface.apply_session_flags(flags);
                }
                self.surface.notify(Severity::Success, "account saved");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Per-row delete button on the accounts table.
    pub fn click_delete_account(&mut self, id: AccountId) {
        if !self.surface.confirm("Delete this account and everything it owns?") {
            return;
        }
        let Some(caller) = self.session.current_identity().map(|identity| identity.id) else {
            self.report(&Error::unauthorized("no active session"));
            return;
        };
        match self.store.delete_account(id, caller) {
            Ok(()) => {
                self.surface.notify(Severity::Success, "account deleted");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Per-row reset-password button on the accounts table.
    pub fn click_reset_password(&mut self, id: AccountId) {
        let Some(password) = self.surface.prompt_text("New password (minimum 6 characters)")
        else {
            return;
        };
        match self.store.reset_password(id, &Zeroizing::new(password)) {
            Ok(()) => self.surface.notify(Severity::Success, "password reset"),
            Err(error) => self.report(&error),
        }
    }

    /// Department form submission; `editing` is `None` for a create.
    pub fn submit_department(&mut self, editing: Option<DepartmentId>, form: DepartmentForm) {
        match self.store.upsert_department(editing, form) {
            Ok(_) => {
                self.surface.notify(Severity::Success, "department saved");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Per-row delete button on the departments table.
    pub fn click_delete_department(&mut self, id: DepartmentId) {
        if !self.surface.confirm("Delete this department?") {
            return;
        }
        match self.store.delete_department(id) {
            Ok(()) => {
                self.surface.notify(Severity::Success, "department deleted");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Open the employee form prefilled for editing.
    pub fn open_employee_form(&self, id: EmployeeId) -> Option<(EmployeeId, EmployeeForm)> {
        self.store.document().employee_by_id(id).map(|employee| {
            (
                id,
                EmployeeForm {
                    account_email: employee.user_email.to_string(),
                    employee_code: employee.employee_code.clone(),
                    department_id: employee.department_id,
                    position: employee.position.clone(),
                    hire_date: employee.hire_date,
                },
            )
        })
    }

    /// Employee form submission; `editing` is `None` for a create.
    pub fn submit_employee(&mut self, editing: Option<EmployeeId>, form: EmployeeForm) {
        match self.store.upsert_employee(editing, form) {
            Ok(_) => {
                self.surface.notify(Severity::Success, "employee saved");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Per-row delete button on the employees table.
    pub fn click_delete_employee(&mut self, id: EmployeeId) {
        if !self.surface.confirm("Delete this employee record?") {
            return;
        }
        self.store.delete_employee(id);
        self.surface.notify(Severity::Success, "employee deleted");
        self.render_current();
    }

    /// Request form submission on behalf of the active session.
    pub fn submit_request(&mut self, form: RequestForm) {
        let Some(caller) = self.session.current_identity().cloned() else {
            self.report(&Error::unauthorized("no active session"));
            return;
        };
        match self.store.submit_request(&caller, form) {
            Ok(_) => {
                self.surface.notify(Severity::Success, "request submitted");
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    /// Approve/reject button on the admin review surface.
    pub fn click_review_request(&mut self, id: RequestId, decision: ReviewDecision) {
        let Some(caller) = self.session.current_identity().cloned() else {
            self.report(&Error::unauthorized("no active session"));
            return;
        };
        match self.store.review_request(&caller, id, decision) {
            Ok(reviewed) => {
                self.surface
                    .notify(Severity::Success, &format!("request {}", reviewed.status));
                self.render_current();
            }
            Err(error) => self.report(&error),
        }
    }

    fn activate(&mut self) {
        self.surface.show_page(self.current.page);
        self.render_current();
    }

    fn render_current(&mut self) {
        let pending = self.storage.pending_verification();
        let view = view::page_view(
            self.current.page,
            self.store.document(),
            self.session.current_identity(),
            pending,
        );
        self.surface.render(view);
    }

    fn report(&mut self, error: &Error) {
        let severity = match error.code() {
            ErrorCode::InvalidRequest | ErrorCode::Conflict => Severity::Warning,
            _ => Severity::Danger,
        };
        self.surface.notify(severity, error.message());
    }
}
