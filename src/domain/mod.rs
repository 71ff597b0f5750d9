//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entity graph persisted as the portal
//! document, plus the services that operate on it. Keep invariants in
//! validated newtypes and document serialisation contracts (serde) in each
//! type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — transport-agnostic failure payload.
//! - `Account`, `Department`, `Employee`, `SupplyRequest` — the entity graph.
//! - `PortalDocument` — the whole persisted state blob.
//! - `PortalStorage` — persistence adapter over the key-value port.
//! - `PortalStore` — mutation operations with referential-integrity upkeep.
//! - `SessionManager` — token-derived authentication state.
//! - `router` — static route table and guard resolution.
//! - `view` — pure view-model builders for the render surface.

pub mod account;
pub mod department;
pub mod document;
pub mod employee;
pub mod error;
pub mod ports;
pub mod request;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use self::account::{Account, AccountId, EmailAddress, PasswordHash, Role, MIN_PASSWORD_LEN};
pub use self::department::{Department, DepartmentId};
pub use self::document::PortalDocument;
pub use self::employee::{Employee, EmployeeId};
pub use self::error::{Error, ErrorCode};
pub use self::request::{RequestId, RequestItem, RequestKind, RequestStatus, SupplyRequest};
pub use self::session::{LoginCredentials, SessionFlags, SessionManager};
pub use self::storage::PortalStorage;
pub use self::store::PortalStore;

/// Convenient domain result alias.
pub type DomainResult<T> = Result<T, Error>;
