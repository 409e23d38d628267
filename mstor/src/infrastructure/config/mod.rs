pub mod mstor_config;

pub use mstor_config::{MstorConfig, MAX_REPLICAS};
