//! `chown(path, user, group)` — change a node's owning uid/gid. Grounded
//! on `mstor_do_chown` in the original source: only the superuser may
//! change ownership to another user, but any member of a group may
//! "chgrp" a node they own into that group.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{MetadataEngine, UserDirectory};
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::permission::Requester;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    _check_perms: bool,
    mut node: ResolvedNode,
    new_user: Option<&str>,
    new_group: Option<&str>,
) -> Result<(), MstorError> {
    if new_user.is_some() && !requester.is_superuser {
        return Err(MstorError::permission(
            "only the superuser may change ownership".to_string(),
        ));
    }
    if new_group.is_some() && !requester.is_superuser && node.payload.uid != requester.uid {
        return Err(MstorError::permission(format!(
            "nid={} is not owned by uid={}",
            node.nid, requester.uid
        )));
    }

    let mut uid = node.payload.uid;
    let mut gid = node.payload.gid;
    if let Some(name) = new_user {
        uid = mstor.user_dir.lookup_user(name)?.uid;
    }
    if let Some(name) = new_group {
        let group = mstor.user_dir.lookup_group(name)?;
        if !requester.is_superuser && !requester.in_gid(group.gid) {
            return Err(MstorError::permission(format!(
                "requester is not a member of group {name}"
            )));
        }
        gid = group.gid;
    }

    let _guard = mstor.lock_node(node.nid);
    node.payload.uid = uid;
    node.payload.gid = gid;
    mstor
        .engine
        .put(&RecordKey::Node(node.nid).encode(), &node.payload.encode())?;
    Ok(())
}
