pub mod dumper;
pub mod mstor_service;
pub mod requests;

pub use mstor_service::{Mstor, ResolvedNode};
