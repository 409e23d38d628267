//! The ordered key-value engine port. An implementation (see
//! `mstor::infrastructure::repositories::rocks_engine`) backs this with an
//! actual on-disk store; the domain layer only depends on this trait.

use crate::error::MstorError;

#[derive(Debug, Clone)]
pub enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// A snapshot-consistent, bidirectional cursor over the engine's key
/// space, seeked to a starting key by [`MetadataEngine::seek`].
pub trait EngineIterator {
    fn valid(&self) -> bool;
    fn key(&self) -> Option<&[u8]>;
    fn value(&self) -> Option<&[u8]>;
    fn next(&mut self);
    fn prev(&mut self);
}

/// The Backing Store Adapter port: a durable, ordered key-value engine
/// supporting point reads/writes, atomic multi-key batches, and ordered
/// iteration from an arbitrary seek key.
pub trait MetadataEngine: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, MstorError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), MstorError>;
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), MstorError>;

    /// Open a cursor seeked to the first key at or after `key`. An empty
    /// `key` seeks to the first key in the whole keyspace.
    fn seek<'a>(&'a self, key: &[u8]) -> Result<Box<dyn EngineIterator + 'a>, MstorError>;
}
