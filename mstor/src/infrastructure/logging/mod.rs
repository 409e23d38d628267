pub mod observability;

pub use observability::init_tracing;
