//! `chunkalloc(nid, off)` — allocate a new chunk for a file at byte
//! offset `off`. Grounded on `mstor_do_chunkalloc` in the original
//! source, addressed directly by nid rather than through the path
//! walker.
//!
//! Two corrections against the original: the new chunk's id is written
//! big-endian into the `f`-family file-chunk key's value (the original
//! writes the host-order bytes of `cid` directly via `memcpy`, which
//! breaks the lexicographic == numeric key ordering every other record
//! family relies on), and the replica counts come from the store's own
//! config rather than a partially-initialized store object.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, MetadataEngine};
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::ids::Nid;
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};
use crate::application::services::requests::ChunkAllocResult;

/// Placeholder replica placement: the production chunk-placement service
/// lives outside this crate, so every allocation is assigned the same
/// fixed replica set, matching the original's `mstor_assign_oid` stub.
fn assign_oids(count: u32) -> Vec<u32> {
    const STUB_OIDS: [u32; 2] = [123, 456];
    (0..count as usize)
        .map(|i| STUB_OIDS[i % STUB_OIDS.len()])
        .collect()
}

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    nid: Nid,
    off: u64,
) -> Result<ChunkAllocResult, MstorError> {
    let file = mstor.fetch_node(nid)?;
    check_access(&file, nid, requester, AccessBits::WRITE, !requester.is_superuser)?;

    let _guard = mstor.lock_node(nid);

    // Reject an allocation that would collide with an already-allocated
    // chunk at this exact offset.
    let file_node = ResolvedNode { nid, payload: file };
    let existing = super::chunkfind::run(mstor, requester, false, file_node, off, off, 1)?;
    if existing.iter().any(|c| c.start == off) {
        return Err(MstorError::already_exists(format!(
            "chunk already allocated at offset {off}"
        )));
    }

    let cid = mstor.alloc.next_cid();
    let man_repl = mstor.config.man_repl.max(mstor.config.min_repl);
    let oids = assign_oids(man_repl);

    let mut replicas_body = Vec::with_capacity(oids.len() * 4);
    for oid in &oids {
        replicas_body.extend_from_slice(&oid.to_be_bytes());
    }

    mstor.engine.write_batch(vec![
        BatchOp::Put(
            RecordKey::FileChunk(nid, off).encode(),
            cid.0.to_be_bytes().to_vec(),
        ),
        BatchOp::Put(RecordKey::ChunkReplicas(cid).encode(), replicas_body),
    ])?;

    Ok(ChunkAllocResult { cid, oids })
}
