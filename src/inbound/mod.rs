//! Inbound side: interaction events translated into domain operations.

pub mod app;

pub use app::PortalApp;
