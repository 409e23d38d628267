pub mod metadata_engine;
pub mod user_directory;

pub use metadata_engine::{BatchOp, EngineIterator, MetadataEngine};
pub use user_directory::{GroupRecord, UserDirectory, UserRecord};
