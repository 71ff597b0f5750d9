//! Domain ports for the hexagonal boundary.
//!
//! The core calls out through exactly two ports: [`KeyValueStore`] for the
//! persistent string store and [`RenderSurface`] for the view collaborator.
//! Adapters are thin translators and contain no business logic.

mod key_value_store;
mod render_surface;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use render_surface::MockRenderSurface;
pub use render_surface::{RecordingRenderSurface, RenderSurface, Severity};
