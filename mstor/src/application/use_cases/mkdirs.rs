//! `mkdirs(path, mode)` — create a directory, synthesizing any missing
//! ancestors along the way. Grounded on `mstor_do_mkdir` in the original
//! source; the ancestor-synthesis itself happens inside
//! `Mstor::walk`, which calls [`create_ancestor`] below.

use mstor_domain::entities::node::NodePayload;
use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, MetadataEngine};
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::ids::Nid;
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

/// Create a single missing ancestor directory under `parent_nid` named
/// `comp`, using the same mode/ctime as the overall `mkdirs` request — the
/// original threads `req->mode`/`req->ctime` through every directory it
/// synthesizes along the walk, not just the terminal one.
pub fn create_ancestor(
    mstor: &Mstor,
    requester: &Requester,
    parent_nid: Nid,
    comp: &str,
    mode: u16,
    ctime: u64,
) -> Result<ResolvedNode, MstorError> {
    let _guard = mstor.lock_node(parent_nid);
    // Another walk may have created this same ancestor between our failed
    // lookup and taking the lock; re-check before allocating a new nid.
    if let Ok(existing) = mstor.fetch_child(parent_nid, comp) {
        return Ok(existing);
    }
    let node = NodePayload::new_dir(ctime, ctime, requester.uid, requester.gid, mode & 0o777);
    let new_nid = mstor.alloc.next_nid();
    mstor.engine.write_batch(vec![
        BatchOp::Put(
            RecordKey::Child(parent_nid, comp.to_string()).encode(),
            new_nid.0.to_be_bytes().to_vec(),
        ),
        BatchOp::Put(RecordKey::Node(new_nid).encode(), node.encode().to_vec()),
    ])?;
    Ok(ResolvedNode {
        nid: new_nid,
        payload: node,
    })
}

/// Terminal step of a `mkdirs` walk. If the full path already resolved to
/// an existing directory, this is a no-op success (the original doesn't
/// treat "already exists" as an error for `mkdirs`); if the terminal
/// component is missing, create it the same way [`create_ancestor`] does.
#[allow(clippy::too_many_arguments)]
pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    _parent: Option<ResolvedNode>,
    existing_or_placeholder: ResolvedNode,
    comp: &str,
    found: bool,
    mode: u16,
    ctime: u64,
) -> Result<(), MstorError> {
    if found {
        check_access(
            &existing_or_placeholder.payload,
            existing_or_placeholder.nid,
            requester,
            AccessBits::EXEC.requires_dir(),
            check_perms,
        )?;
        return Ok(());
    }
    let parent = existing_or_placeholder;
    check_access(
        &parent.payload,
        parent.nid,
        requester,
        AccessBits::WRITE.requires_dir(),
        check_perms,
    )?;
    create_ancestor(mstor, requester, parent.nid, comp, mode, ctime)?;
    Ok(())
}
