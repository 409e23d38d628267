//! RocksDB-backed [`MetadataEngine`].
//!
//! Opens a single column family with a block-based table factory backed
//! by an LRU block cache sized from configuration, and issues every write
//! with `sync` set so a successful `put`/`write_batch` is durable before
//! it returns, matching the "Writes are durable" requirement on the
//! Backing Store Adapter.

use std::path::Path;

use rocksdb::{
    BlockBasedOptions, Cache, Direction, IteratorMode, Options, WriteBatch as RocksWriteBatch,
    WriteOptions, DB,
};

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, EngineIterator, MetadataEngine};

pub struct RocksEngine {
    db: DB,
    write_opts: WriteOptions,
}

impl RocksEngine {
    pub fn open(path: impl AsRef<Path>, cache_bytes: usize) -> Result<Self, MstorError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let cache = Cache::new_lru_cache(cache_bytes);
        let mut table_opts = BlockBasedOptions::default();
        table_opts.set_block_cache(&cache);
        opts.set_block_based_table_factory(&table_opts);

        let db = DB::open(&opts, path).map_err(|e| MstorError::Io(e.to_string()))?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(true);

        Ok(RocksEngine { db, write_opts })
    }

    /// `true` if the engine holds no records at all — the signal
    /// bootstrap uses to decide between formatting a fresh store and
    /// recovering an existing one.
    pub fn is_empty(&self) -> Result<bool, MstorError> {
        let mut iter = self.db.iterator(IteratorMode::Start);
        Ok(iter.next().is_none())
    }
}

impl MetadataEngine for RocksEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, MstorError> {
        self.db.get(key).map_err(|e| MstorError::Io(e.to_string()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), MstorError> {
        self.db
            .put_opt(key, value, &self.write_opts)
            .map_err(|e| MstorError::Io(e.to_string()))
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), MstorError> {
        let mut batch = RocksWriteBatch::default();
        for op in ops {
            match op {
                BatchOp::Put(k, v) => batch.put(k, v),
                BatchOp::Delete(k) => batch.delete(k),
            }
        }
        self.db
            .write_opt(batch, &self.write_opts)
            .map_err(|e| MstorError::Io(e.to_string()))
    }

    fn seek<'a>(&'a self, key: &[u8]) -> Result<Box<dyn EngineIterator + 'a>, MstorError> {
        let mut cursor = RocksCursor {
            db: &self.db,
            current: None,
        };
        cursor.seek_forward(key);
        Ok(Box::new(cursor))
    }
}

/// A bidirectional cursor over the engine's key space. `rust-rocksdb`'s
/// iterator is single-direction once constructed, so `next`/`prev` each
/// open a fresh iterator positioned just past (or before) the current
/// key rather than reusing one — the same "re-seek per step" approach
/// `mstor_do_rmdir`'s forward-only walk and the bootstrap recovery's
/// single backward step both need, at the cost of one extra seek per
/// direction change.
struct RocksCursor<'a> {
    db: &'a DB,
    current: Option<(Box<[u8]>, Box<[u8]>)>,
}

impl<'a> RocksCursor<'a> {
    fn seek_forward(&mut self, key: &[u8]) {
        let mode = if key.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(key, Direction::Forward)
        };
        self.current = self
            .db
            .iterator(mode)
            .next()
            .and_then(|r| r.ok());
    }
}

impl<'a> EngineIterator for RocksCursor<'a> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(k, _)| k.as_ref())
    }

    fn value(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(_, v)| v.as_ref())
    }

    fn next(&mut self) {
        let Some((key, _)) = self.current.take() else {
            return;
        };
        let mut iter = self
            .db
            .iterator(IteratorMode::From(&key, Direction::Forward));
        // The forward iterator's first hit is `key` itself; skip it.
        let _ = iter.next();
        self.current = iter.next().and_then(|r| r.ok());
    }

    fn prev(&mut self) {
        let Some((key, _)) = self.current.take() else {
            return;
        };
        let mut iter = self
            .db
            .iterator(IteratorMode::From(&key, Direction::Reverse));
        // The reverse iterator's first hit is `key` itself; skip it.
        let _ = iter.next();
        self.current = iter.next().and_then(|r| r.ok());
    }
}
