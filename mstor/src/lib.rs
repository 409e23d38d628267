//! RocksDB-backed implementation of the mstor embedded metadata store.
//!
//! `mstor_domain` defines the types, ports, and pure logic; this crate
//! wires a concrete [`infrastructure::repositories::rocks_engine::RocksEngine`]
//! and [`infrastructure::config::MstorConfig`] into the
//! [`application::services::Mstor`] facade that bootstrap binaries and
//! tests talk to.

pub mod application;
pub mod infrastructure;

pub use application::services::{Mstor, ResolvedNode};
pub use application::services::requests;
