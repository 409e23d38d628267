//! `utimes(path, atime, mtime)` — update a node's timestamps. Grounded on
//! `mstor_do_utimes` in the original source: `INVAL_TIME` in either field
//! means "leave this timestamp unchanged", and only the owner or the
//! superuser may call it.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::MetadataEngine;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::Requester;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};
use crate::application::services::requests::INVAL_TIME;

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    _check_perms: bool,
    mut node: ResolvedNode,
    atime: u64,
    mtime: u64,
) -> Result<(), MstorError> {
    if !requester.is_superuser && node.payload.uid != requester.uid {
        return Err(MstorError::permission(format!(
            "nid={} is not owned by uid={}",
            node.nid, requester.uid
        )));
    }

    let _guard = mstor.lock_node(node.nid);
    if atime != INVAL_TIME {
        node.payload.atime = atime;
    }
    if mtime != INVAL_TIME {
        node.payload.mtime = mtime;
    }
    mstor
        .engine
        .put(&RecordKey::Node(node.nid).encode(), &node.payload.encode())?;
    Ok(())
}
