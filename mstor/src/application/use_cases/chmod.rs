//! `chmod(path, mode)` — change a node's permission bits. Grounded on
//! `mstor_do_chmod` in the original source: only the owner or the
//! superuser may change a node's mode.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::MetadataEngine;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::Requester;
use mstor_domain::value_objects::mode::Mode;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    _check_perms: bool,
    mut node: ResolvedNode,
    mode: u16,
) -> Result<(), MstorError> {
    if !requester.is_superuser && node.payload.uid != requester.uid {
        return Err(MstorError::permission(format!(
            "nid={} is not owned by uid={}",
            node.nid, requester.uid
        )));
    }

    let _guard = mstor.lock_node(node.nid);
    node.payload.mode_and_type = Mode::new(mode, node.payload.mode_and_type.is_dir());
    mstor
        .engine
        .put(&RecordKey::Node(node.nid).encode(), &node.payload.encode())?;
    Ok(())
}
