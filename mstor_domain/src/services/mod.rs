pub mod id_allocator;
pub mod key_codec;
pub mod path_walk;
pub mod payload_codec;
pub mod permission;

pub use id_allocator::IdAllocator;
pub use key_codec::RecordKey;
pub use path_walk::OperationKind;
pub use payload_codec::StatRecord;
pub use permission::{check_access, Requester};
