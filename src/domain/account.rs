//! Account identity and credential records.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

const SALT_LEN: usize = 16;

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    Malformed,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::Malformed => write!(f, "email must contain a local part and a domain"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Account email address, the natural key of several relations.
///
/// ## Invariants
/// - Stored lowercase-normalised, so equality and hashing are
///   case-insensitive by construction.
/// - Contains exactly one `@` separating non-empty local and domain parts.
///
/// # Examples
/// ```
/// use staffdesk::domain::EmailAddress;
///
/// let a = EmailAddress::parse("Ann@X.com").unwrap();
/// let b = EmailAddress::parse("ann@x.com").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from raw input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        Self::from_owned(raw.as_ref().trim().to_lowercase())
    }

    fn from_owned(normalised: String) -> Result<Self, EmailValidationError> {
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        let mut parts = normalised.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(normalised))
    }

    /// The normalised address string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value.trim().to_lowercase())
    }
}

/// Salted SHA-256 credential hash.
///
/// The persisted representation never contains the plaintext password;
/// [`PasswordHash::verify`] recomputes the digest from a candidate instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    /// Derive a hash from a plaintext password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest_with(&salt, password);
        Self {
            salt: hex::encode(salt),
            digest: hex::encode(digest),
        }
    }

    /// Check a candidate password against the stored digest.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(salt) = hex::decode(&self.salt) else {
            return false;
        };
        hex::encode(Self::digest_with(&salt, candidate)) == self.digest
    }

    fn digest_with(salt: &[u8], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role gating access to the admin surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Whether this role passes admin-only route guards.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::User => f.write_str("user"),
        }
    }
}

/// Identity plus credential record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: PasswordHash,
    pub verified: bool,
    pub role: Role,
}

impl Account {
    /// Display name combining first and last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Plaintext password input kept zeroised once dropped.
pub type PasswordInput = Zeroizing<String>;
