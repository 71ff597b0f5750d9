//! Staffdesk library modules.
//!
//! A client-side employee-portal core: accounts, departments, employees,
//! and supply requests persisted wholesale to a local key-value store.
//! The crate follows a hexagonal layout: `domain` holds entities, services,
//! and ports; `outbound` provides key-value store adapters; `inbound` is the
//! application shell translating interaction events into domain operations.

pub mod domain;
pub mod inbound;
pub mod outbound;

pub use inbound::app::PortalApp;
