//! `chunkfind(path, start, end, max_chunks)` — list the chunks covering
//! `[start, end]` of a file. Grounded on `mstor_chunkfind_impl` in the
//! original source: seek past `start` then step back once to land on the
//! chunk whose offset is at or below `start` (a round-down-by-overshoot
//! the original itself flags wanting to replace with a real predecessor
//! seek), then walk forward collecting chunks while their offset is still
//! within `end` and under `max_chunks`.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::MetadataEngine;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::ids::Cid;
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};
use crate::application::services::requests::ChunkInfo;

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    file: ResolvedNode,
    start: u64,
    end: u64,
    max_chunks: usize,
) -> Result<Vec<ChunkInfo>, MstorError> {
    check_access(&file.payload, file.nid, requester, AccessBits::READ, check_perms)?;

    let seek_key = RecordKey::FileChunk(file.nid, start.saturating_add(1)).encode();
    let mut cursor = mstor.engine.seek(&seek_key)?;
    cursor.prev();

    let mut out = Vec::with_capacity(max_chunks.min(16));
    while cursor.valid() && out.len() < max_chunks {
        let key = cursor.key().expect("valid cursor has a key").to_vec();
        let base = match RecordKey::decode(&key)? {
            RecordKey::FileChunk(nid, base) if nid == file.nid => base,
            _ => break,
        };
        if base > end {
            break;
        }
        let raw = cursor
            .value()
            .ok_or_else(|| MstorError::corruption("file-chunk record missing value"))?;
        if raw.len() != 8 {
            return Err(MstorError::corruption("file-chunk record has wrong length"));
        }
        let cid = Cid(u64::from_be_bytes(raw.try_into().unwrap()));
        out.push(ChunkInfo { cid, start: base });
        cursor.next();
    }
    Ok(out)
}
