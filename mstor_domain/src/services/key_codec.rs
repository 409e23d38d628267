//! Encoding and decoding of engine keys.
//!
//! Every record kind is tagged by its first byte (`v`, `n`, `c`, `f`, `h`,
//! `u`), matching the original source's key-construction macros, but the
//! tag is exposed to the rest of the domain as a typed sum rather than a
//! raw byte, per the "typed sum for key tagging" design note.

use crate::error::MstorError;
use crate::value_objects::ids::{Cid, Nid};
use crate::value_objects::path::PCOMP_MAX;

const TAG_VERSION: u8 = b'v';
const TAG_NODE: u8 = b'n';
const TAG_CHILD: u8 = b'c';
const TAG_FILE_CHUNK: u8 = b'f';
const TAG_CHUNK_REPLICAS: u8 = b'h';
const TAG_SEQUESTERED: u8 = b'u';

pub const NODE_KEY_LEN: usize = 1 + 8;
pub const FILE_CHUNK_KEY_LEN: usize = 1 + 8 + 8;
pub const CHUNK_REPLICAS_KEY_LEN: usize = 1 + 8;
const CHILD_KEY_PREFIX_LEN: usize = 1 + 8;

/// A decoded, typed engine key. `encode` is the inverse of `decode` for
/// every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Version,
    Node(Nid),
    Child(Nid, String),
    FileChunk(Nid, u64),
    ChunkReplicas(Cid),
    Sequestered(u64, Cid),
}

impl RecordKey {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            RecordKey::Version => vec![TAG_VERSION],
            RecordKey::Node(nid) => {
                let mut buf = Vec::with_capacity(NODE_KEY_LEN);
                buf.push(TAG_NODE);
                buf.extend_from_slice(&nid.0.to_be_bytes());
                buf
            }
            RecordKey::Child(parent, name) => {
                let mut buf = Vec::with_capacity(CHILD_KEY_PREFIX_LEN + name.len());
                buf.push(TAG_CHILD);
                buf.extend_from_slice(&parent.0.to_be_bytes());
                buf.extend_from_slice(name.as_bytes());
                buf
            }
            RecordKey::FileChunk(nid, start_off) => {
                let mut buf = Vec::with_capacity(FILE_CHUNK_KEY_LEN);
                buf.push(TAG_FILE_CHUNK);
                buf.extend_from_slice(&nid.0.to_be_bytes());
                buf.extend_from_slice(&start_off.to_be_bytes());
                buf
            }
            RecordKey::ChunkReplicas(cid) => {
                let mut buf = Vec::with_capacity(CHUNK_REPLICAS_KEY_LEN);
                buf.push(TAG_CHUNK_REPLICAS);
                buf.extend_from_slice(&cid.0.to_be_bytes());
                buf
            }
            RecordKey::Sequestered(unlink_time, cid) => {
                let mut buf = Vec::with_capacity(1 + 8 + 8);
                buf.push(TAG_SEQUESTERED);
                buf.extend_from_slice(&unlink_time.to_be_bytes());
                buf.extend_from_slice(&cid.0.to_be_bytes());
                buf
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MstorError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or_else(|| MstorError::malformed("zero-length key"))?;
        match tag {
            TAG_VERSION => {
                if !rest.is_empty() {
                    return Err(MstorError::malformed("version key has trailing bytes"));
                }
                Ok(RecordKey::Version)
            }
            TAG_NODE => {
                if rest.len() != 8 {
                    return Err(MstorError::malformed("node key has wrong length"));
                }
                Ok(RecordKey::Node(Nid(u64::from_be_bytes(
                    rest.try_into().unwrap(),
                ))))
            }
            TAG_CHILD => {
                if rest.len() <= 8 {
                    return Err(MstorError::malformed("child key missing name"));
                }
                let (nid_bytes, name_bytes) = rest.split_at(8);
                if name_bytes.len() >= PCOMP_MAX {
                    return Err(MstorError::name_too_long("child key component"));
                }
                let name = std::str::from_utf8(name_bytes)
                    .map_err(|_| MstorError::malformed("child key name is not utf8"))?
                    .to_string();
                Ok(RecordKey::Child(
                    Nid(u64::from_be_bytes(nid_bytes.try_into().unwrap())),
                    name,
                ))
            }
            TAG_FILE_CHUNK => {
                if rest.len() != 16 {
                    return Err(MstorError::malformed("file-chunk key has wrong length"));
                }
                let (nid_bytes, off_bytes) = rest.split_at(8);
                Ok(RecordKey::FileChunk(
                    Nid(u64::from_be_bytes(nid_bytes.try_into().unwrap())),
                    u64::from_be_bytes(off_bytes.try_into().unwrap()),
                ))
            }
            TAG_CHUNK_REPLICAS => {
                if rest.len() != 8 {
                    return Err(MstorError::malformed("chunk-replicas key has wrong length"));
                }
                Ok(RecordKey::ChunkReplicas(Cid(u64::from_be_bytes(
                    rest.try_into().unwrap(),
                ))))
            }
            TAG_SEQUESTERED => {
                if rest.len() != 16 {
                    return Err(MstorError::malformed("sequestered key has wrong length"));
                }
                let (time_bytes, cid_bytes) = rest.split_at(8);
                Ok(RecordKey::Sequestered(
                    u64::from_be_bytes(time_bytes.try_into().unwrap()),
                    Cid(u64::from_be_bytes(cid_bytes.try_into().unwrap())),
                ))
            }
            other => Err(MstorError::malformed(format!(
                "unknown key family tag: {other:#x}"
            ))),
        }
    }

    /// The upper bound, exclusive, of every key that could belong to this
    /// node's `c`-family child entries — used by `listdir` and `rmdir` to
    /// know when an iterator has walked past the last child.
    pub fn child_prefix(parent: Nid) -> Vec<u8> {
        let mut buf = Vec::with_capacity(CHILD_KEY_PREFIX_LEN);
        buf.push(TAG_CHILD);
        buf.extend_from_slice(&parent.0.to_be_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_key_round_trips() {
        let k = RecordKey::Node(Nid(42));
        assert_eq!(RecordKey::decode(&k.encode()).unwrap(), k);
    }

    #[test]
    fn child_key_round_trips() {
        let k = RecordKey::Child(Nid(7), "hello.txt".to_string());
        assert_eq!(RecordKey::decode(&k.encode()).unwrap(), k);
    }

    #[test]
    fn file_chunk_key_round_trips() {
        let k = RecordKey::FileChunk(Nid(3), 4096);
        assert_eq!(RecordKey::decode(&k.encode()).unwrap(), k);
    }

    #[test]
    fn chunk_replicas_key_round_trips() {
        let k = RecordKey::ChunkReplicas(Cid(99));
        assert_eq!(RecordKey::decode(&k.encode()).unwrap(), k);
    }

    #[test]
    fn version_key_round_trips() {
        assert_eq!(RecordKey::decode(&RecordKey::Version.encode()).unwrap(), RecordKey::Version);
    }

    #[test]
    fn keys_sort_by_numeric_nid_due_to_big_endian_encoding() {
        let low = RecordKey::Node(Nid(1)).encode();
        let high = RecordKey::Node(Nid(2)).encode();
        assert!(low < high);
        let low = RecordKey::Node(Nid(0x100)).encode();
        let high = RecordKey::Node(Nid(0x101)).encode();
        assert!(low < high);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(RecordKey::decode(&[b'z']).is_err());
    }
}
