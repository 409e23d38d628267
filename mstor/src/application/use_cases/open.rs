//! `open(path)` — resolve a file for reads and stamp its atime. Grounded
//! on `mstor_do_open` in the original source.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::MetadataEngine;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    mut node: ResolvedNode,
    atime: u64,
) -> Result<ResolvedNode, MstorError> {
    check_access(&node.payload, node.nid, requester, AccessBits::READ, check_perms)?;

    let _guard = mstor.lock_node(node.nid);
    node.payload.atime = atime;
    mstor
        .engine
        .put(&RecordKey::Node(node.nid).encode(), &node.payload.encode())?;
    Ok(node)
}
