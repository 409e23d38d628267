//! `creat(path, mode)` — create a new file. Grounded on
//! `mstor_do_creat`/`mstor_make_node` in the original source.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, MetadataEngine};
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

#[allow(clippy::too_many_arguments)]
pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    _grandparent: Option<ResolvedNode>,
    parent_or_node: ResolvedNode,
    comp: &str,
    found: bool,
    mode: u16,
    ctime: u64,
) -> Result<ResolvedNode, MstorError> {
    if found {
        // The terminal component already exists; the original never
        // implements overwrite for `creat`.
        return Err(MstorError::already_exists(parent_or_node.nid.to_string()));
    }
    let parent = parent_or_node;
    check_access(
        &parent.payload,
        parent.nid,
        requester,
        AccessBits::WRITE.requires_dir(),
        check_perms,
    )?;

    let _guard = mstor.lock_node(parent.nid);
    let node = mstor_domain::entities::node::NodePayload::new_file(
        ctime,
        ctime,
        requester.uid,
        requester.gid,
        mode & 0o777,
    );
    let new_nid = mstor.alloc.next_nid();

    mstor.engine.write_batch(vec![
        BatchOp::Put(
            RecordKey::Child(parent.nid, comp.to_string()).encode(),
            new_nid.0.to_be_bytes().to_vec(),
        ),
        BatchOp::Put(RecordKey::Node(new_nid).encode(), node.encode().to_vec()),
    ])?;

    Ok(ResolvedNode {
        nid: new_nid,
        payload: node,
    })
}
