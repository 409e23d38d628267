//! `rmdir(path, recursive)` — remove a directory, optionally recursing
//! into its descendants first. Grounded on `mstor_do_rmdir` in the
//! original source, with the parent/child argument order at dispatch kept
//! consistent end to end (the original swaps them at the
//! `MSTOR_OP_RMDIR` dispatch site) and full multi-level recursion instead
//! of the original's apparent single-level child walk.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, MetadataEngine};
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::ids::Nid;
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

/// Collect every descendant of `nid` as `Delete` batch ops for both its
/// child-entry key and its node key, recursing depth-first. Returns the
/// number of direct children, for the non-recursive empty-check.
fn collect_descendants(
    mstor: &Mstor,
    nid: Nid,
    out: &mut Vec<BatchOp>,
) -> Result<usize, MstorError> {
    let prefix = RecordKey::child_prefix(nid);
    let mut direct_children = 0usize;
    let mut cursor = mstor.engine.seek(&prefix)?;
    while cursor.valid() {
        let key = cursor.key().expect("valid cursor has a key").to_vec();
        if !key.starts_with(&prefix) {
            break;
        }
        match RecordKey::decode(&key)? {
            RecordKey::Child(parent, _name) if parent == nid => {
                direct_children += 1;
                let raw = cursor
                    .value()
                    .ok_or_else(|| MstorError::corruption("child record missing value"))?;
                if raw.len() != 8 {
                    return Err(MstorError::corruption("child record has wrong length"));
                }
                let child_nid = Nid(u64::from_be_bytes(raw.try_into().unwrap()));
                out.push(BatchOp::Delete(key.clone()));
                out.push(BatchOp::Delete(RecordKey::Node(child_nid).encode()));
                collect_descendants(mstor, child_nid, out)?;
            }
            _ => break,
        }
        cursor.next();
    }
    Ok(direct_children)
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    parent: Option<ResolvedNode>,
    node: ResolvedNode,
    name: &str,
    found: bool,
    recursive: bool,
) -> Result<(), MstorError> {
    if !found {
        return Err(MstorError::not_found(name.to_string()));
    }
    let parent = match parent {
        Some(p) => p,
        None => {
            return Err(MstorError::permission(
                "cannot remove the root directory".to_string(),
            ))
        }
    };

    check_access(
        &parent.payload,
        parent.nid,
        requester,
        AccessBits::WRITE.requires_dir(),
        check_perms,
    )?;

    let _parent_guard = mstor.lock_node(parent.nid);
    let _node_guard = mstor.lock_node(node.nid);

    let mut ops = Vec::new();
    let direct_children = collect_descendants(mstor, node.nid, &mut ops)?;
    if !recursive && direct_children > 0 {
        return Err(MstorError::not_empty(node.nid.to_string()));
    }

    ops.push(BatchOp::Delete(
        RecordKey::Child(parent.nid, name.to_string()).encode(),
    ));
    ops.push(BatchOp::Delete(RecordKey::Node(node.nid).encode()));
    mstor.engine.write_batch(ops)
}
