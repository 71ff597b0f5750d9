//! Hash-location router with session guards.
//!
//! The route table is static. Resolution maps a requested location to
//! exactly one page, redirecting whenever a guard fails: unauthenticated
//! callers land on the login page, authenticated callers are kept off
//! guest-only pages, and non-admins are kept off admin-only pages. Redirects
//! re-enter resolution; the authenticated landing passes guards for every
//! role, so resolution always terminates.

use std::fmt;

use crate::domain::session::SessionFlags;

/// Location shown when nothing (or something unknown) is requested.
pub const DEFAULT_LOCATION: &str = "#/login";
/// Landing location for any authenticated role.
pub const LANDING_LOCATION: &str = "#/home";

/// A hash-style navigation location such as `#/accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    /// Wrap a raw location string as emitted by the navigation collaborator.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The default (guest) location.
    pub fn default_location() -> Self {
        Self(DEFAULT_LOCATION.to_owned())
    }

    /// The authenticated landing location.
    pub fn landing() -> Self {
        Self(LANDING_LOCATION.to_owned())
    }

    /// The raw location string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of pages the render surface can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    VerifyEmail,
    Home,
    Requests,
    Accounts,
    Departments,
    Employees,
}

/// Table refresh run when a route is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    AccountsTable,
    DepartmentsTable,
    EmployeesTable,
    RequestsTable,
}

struct RouteSpec {
    location: &'static str,
    page: Page,
    guest_only: bool,
    auth_required: bool,
    admin_only: bool,
    refresh: Option<RefreshAction>,
}

const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        location: "#/login",
        page: Page::Login,
        guest_only: true,
        auth_required: false,
        admin_only: false,
        refresh: None,
    },
    RouteSpec {
        location: "#/register",
        page: Page::Register,
        guest_only: true,
        auth_required: false,
        admin_only: false,
        refresh: None,
    },
    RouteSpec {
        location: "#/verify-email",
        page: Page::VerifyEmail,
        guest_only: true,
        auth_required: false,
        admin_only: false,
        refresh: None,
    },
    RouteSpec {
        location: "#/home",
        page: Page::Home,
        guest_only: false,
        auth_required: true,
        admin_only: false,
        refresh: None,
    },
    RouteSpec {
        location: "#/requests",
        page: Page::Requests,
        guest_only: false,
        auth_required: true,
        admin_only: false,
        refresh: Some(RefreshAction::RequestsTable),
    },
    RouteSpec {
        location: "#/accounts",
        page: Page::Accounts,
        guest_only: false,
        auth_required: true,
        admin_only: true,
        refresh: Some(RefreshAction::AccountsTable),
    },
    RouteSpec {
        location: "#/departments",
        page: Page::Departments,
        guest_only: false,
        auth_required: true,
        admin_only: true,
        refresh: Some(RefreshAction::DepartmentsTable),
    },
    RouteSpec {
        location: "#/employees",
        page: Page::Employees,
        guest_only: false,
        auth_required: true,
        admin_only: true,
        refresh: Some(RefreshAction::EmployeesTable),
    },
];

/// Outcome of resolving a location against the route table and guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The page to show.
    pub page: Page,
    /// The location actually activated, after any redirects.
    pub location: Location,
    /// Refresh to run on activation, if the route declares one.
    pub refresh: Option<RefreshAction>,
    /// Whether a guard redirected away from the requested location.
    pub redirected: bool,
}

fn route_for(location: &Location) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|spec| spec.location == location.as_str())
}

/// Resolve a requested location to exactly one page.
///
/// Unknown locations are treated as the default location. Guard failures
/// redirect and re-enter resolution; redirect targets always pass their own
/// guards, so the loop runs at most a couple of iterations.
pub fn resolve(requested: &Location, flags: SessionFlags) -> Resolution {
    let mut location = requested.clone();
    let mut redirected = false;
    loop {
        let Some(spec) = route_for(&location) else {
            tracing::debug!(requested = %location, "unknown location; using default");
            location = Location::default_location();
            redirected = location.as_str() != requested.as_str();
            continue;
        };
        if spec.auth_required && !flags.authenticated {
            tracing::debug!(to = DEFAULT_LOCATION, "guard redirect: authentication required");
            location = Location::default_location();
            redirected = true;
            continue;
        }
        if spec.guest_only && flags.authenticated {
            tracing::debug!(to = LANDING_LOCATION, "guard redirect: guest-only page");
            location = Location::landing();
            redirected = true;
            continue;
        }
        if spec.admin_only && !flags.admin {
            tracing::debug!(to = LANDING_LOCATION, "guard redirect: admin-only page");
            location = Location::landing();
            redirected = true;
            continue;
        }
        return Resolution {
            page: spec.page,
            location,
            refresh: spec.refresh,
            redirected,
        };
    }
}
