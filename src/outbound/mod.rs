//! Outbound adapters implementing domain ports for concrete infrastructure.
//!
//! Adapters are thin translators between the string-slot port and an actual
//! backing store. They contain no business logic; serialisation and key
//! layout live in the domain's persistence adapter.

pub mod persistence;
