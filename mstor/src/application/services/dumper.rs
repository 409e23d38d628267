//! Deterministic, human-readable dump of the whole keyspace, in key
//! order. Grounded on the original source's debug dump tooling: walk the
//! engine from the first key to the last, decoding each record by its
//! family tag.

use std::io::Write;

use mstor_domain::entities::node::NodePayload;
use mstor_domain::error::MstorError;
use mstor_domain::services::key_codec::RecordKey;

use super::mstor_service::Mstor;

pub fn dump(mstor: &Mstor, out: &mut impl Write) -> Result<(), MstorError> {
    let mut cursor = mstor.engine.seek(&[])?;
    while cursor.valid() {
        let key = cursor.key().expect("valid cursor has a key").to_vec();
        let value = cursor
            .value()
            .ok_or_else(|| MstorError::corruption("record missing value"))?
            .to_vec();
        write_record(out, &key, &value)?;
        cursor.next();
    }
    Ok(())
}

fn write_record(out: &mut impl Write, key: &[u8], value: &[u8]) -> Result<(), MstorError> {
    match RecordKey::decode(key)? {
        RecordKey::Version => {
            if value.len() == 8 {
                let version = u32::from_be_bytes(value[4..8].try_into().unwrap());
                writeln!(out, "MSTOR_VERSION({version})")?;
            } else {
                writeln!(out, "MSTOR_VERSION(<malformed, {} bytes>)", value.len())?;
            }
        }
        RecordKey::Node(nid) => match NodePayload::decode(&value) {
            Ok(n) => writeln!(
                out,
                "NODE({nid}) => {{ ty={}, mode={:04o}, mtime={}, atime={}, uid={}, gid={} }}",
                if n.mode_and_type.is_dir() { "DIR" } else { "FILE" },
                n.mode_and_type.perm_bits(),
                n.mtime,
                n.atime,
                n.uid,
                n.gid
            )?,
            Err(_) => writeln!(out, "NODE({nid}) => <malformed, {} bytes>", value.len())?,
        },
        RecordKey::Child(parent, name) => {
            if value.len() == 8 {
                let cid = u64::from_be_bytes(value.try_into().unwrap());
                writeln!(out, "CHILD({parent}, {name}) => {cid}")?;
            } else {
                writeln!(out, "CHILD({parent}, {name}) => <malformed>")?;
            }
        }
        RecordKey::FileChunk(nid, off) => {
            if value.len() == 8 {
                let cid = u64::from_be_bytes(value.try_into().unwrap());
                writeln!(out, "FILE({nid}, {off}) => {cid}")?;
            } else {
                writeln!(out, "FILE({nid}, {off}) => <malformed>")?;
            }
        }
        RecordKey::ChunkReplicas(cid) => {
            if value.len() % 4 == 0 {
                let oids: Vec<String> = value
                    .chunks_exact(4)
                    .map(|c| u32::from_be_bytes(c.try_into().unwrap()).to_string())
                    .collect();
                writeln!(out, "CHUNK({cid}) => [{}]", oids.join(", "))?;
            } else {
                writeln!(out, "CHUNK({cid}) => <malformed, {} bytes>", value.len())?;
            }
        }
        RecordKey::Sequestered(unlink_time, cid) => {
            writeln!(out, "SEQUESTERED({cid}, {unlink_time})")?;
        }
    }
    Ok(())
}
