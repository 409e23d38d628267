//! Domain layer for `mstor`, the embedded metadata store.
//!
//! This crate is pure: record codecs, id allocation, permission checks,
//! and path canonicalization, plus the ports (`MetadataEngine`,
//! `UserDirectory`) that the infrastructure layer in the `mstor` crate
//! implements. Nothing here touches a filesystem or a particular storage
//! engine.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::{MstorError, MstorResult};
