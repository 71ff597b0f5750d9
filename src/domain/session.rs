//! Session state derived from the persisted auth token.
//!
//! "Who is logged in" is never stored as its own record: it is always the
//! result of looking the token (the account's email) up in the document, at
//! startup and after login/logout/self-edit. The only observable side effect
//! is the pair of presentation flags the view layer consumes.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::account::{Account, EmailAddress};
use crate::domain::document::PortalDocument;
use crate::domain::error::Error;
use crate::domain::ports::KeyValueStore;
use crate::domain::storage::PortalStorage;
use crate::domain::DomainResult;

/// The single message every login failure collapses into, so callers cannot
/// distinguish a wrong password from an unknown or unverified account.
pub const LOGIN_FAILED_MESSAGE: &str = "invalid credentials or unverified account";

/// Presentation flags consumed by the view layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub authenticated: bool,
    pub admin: bool,
}

/// Validation errors returned by [`LoginCredentials::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised (lowercase, trimmed) so lookups are
///   case-insensitive.
/// - `password` is non-empty and retains caller-provided whitespace; the
///   comparison against the stored hash is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email =
            EmailAddress::parse(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Runtime record of which account, if any, is currently authenticated.
pub struct SessionManager<S> {
    storage: PortalStorage<S>,
    current: Option<Account>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Start with no active session.
    pub fn new(storage: PortalStorage<S>) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Re-derive the session from the persisted token. A token that no
    /// longer resolves to an account is discarded.
    pub fn restore(&mut self, document: &PortalDocument) {
        let Some(raw) = self.storage.auth_token() else {
            self.current = None;
            return;
        };
        let account = EmailAddress::parse(&raw)
            .ok()
            .and_then(|email| document.account_by_email(&email).cloned());
        if account.is_none() {
            tracing::debug!("persisted auth token resolves to no account; clearing");
            self.storage.clear_auth_token();
        }
        self.current = account;
    }

    /// Authenticate and establish a session. Requires a matching email, a
    /// matching password, and a verified account; every mismatch yields the
    /// same generic failure.
    pub fn login(
        &mut self,
        document: &PortalDocument,
        credentials: &LoginCredentials,
    ) -> DomainResult<Account> {
        let Some(account) = document.account_by_email(credentials.email()) else {
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        };
        if !account.verified || !account.password.verify(credentials.password()) {
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        }
        let account = account.clone();
        self.establish(account.clone());
        tracing::info!(email = %account.email, "session established");
        Ok(account)
    }

    /// Make the given account the active identity and persist its token.
    pub fn establish(&mut self, account: Account) -> SessionFlags {
        self.storage.set_auth_token(&account.email);
        self.current = Some(account);
        self.flags()
    }

    /// Drop the active identity and the persisted token.
    pub fn clear(&mut self) -> SessionFlags {
        self.storage.clear_auth_token();
        self.current = None;
        self.flags()
    }

    /// The currently authenticated account, if any.
    pub fn current_identity(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// Presentation flags derived from the current identity.
    pub fn flags(&self) -> SessionFlags {
        SessionFlags {
            authenticated: self.current.is_some(),
            admin: self
                .current
                .as_ref()
                .is_some_and(|account| account.role.is_admin()),
        }
    }
}
