//! POSIX-style access checks against a node's packed mode.

use crate::entities::node::NodePayload;
use crate::error::MstorError;
use crate::value_objects::ids::Nid;
use crate::value_objects::mode::AccessBits;

/// The identity a request is being checked on behalf of.
#[derive(Debug, Clone)]
pub struct Requester {
    pub uid: u32,
    pub gid: u32,
    pub groups: Vec<u32>,
    /// The superuser bypasses every check; callers set this once, at
    /// request construction, from the user-directory lookup.
    pub is_superuser: bool,
}

impl Requester {
    pub fn in_gid(&self, gid: u32) -> bool {
        self.gid == gid || self.groups.contains(&gid)
    }
}

/// Check `want` against `node`'s mode for `requester`.
///
/// `check_perms` mirrors `MREQ_FLAG_CHECK_PERMS`: when false (root, or a
/// `mkdirs` ancestor created earlier in the same walk) the type check
/// (dir/not-dir) still applies but the permission-bit check is skipped
/// entirely.
pub fn check_access(
    node: &NodePayload,
    nid: Nid,
    requester: &Requester,
    want: AccessBits,
    check_perms: bool,
) -> Result<(), MstorError> {
    let mode = node.mode_and_type;
    if want.wants_dir() {
        if !mode.is_dir() {
            return Err(MstorError::not_dir(nid.to_string()));
        }
    } else if mode.is_dir() {
        return Err(MstorError::is_dir(nid.to_string()));
    }

    if !check_perms || requester.is_superuser {
        return Ok(());
    }

    let want_bits = want.perm_bits();
    if mode.world_allows(want_bits) {
        return Ok(());
    }
    if node.uid == requester.uid && mode.owner_allows(want_bits) {
        return Ok(());
    }
    if requester.in_gid(node.gid) && mode.group_allows(want_bits) {
        return Ok(());
    }
    Err(MstorError::permission(format!(
        "nid={nid} want={want_bits:#o} mode={:#o}",
        mode.perm_bits()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::mode::{Mode, PERM_READ, PERM_WRITE};

    fn node_with_mode(perm: u16, is_dir: bool, uid: u32, gid: u32) -> NodePayload {
        NodePayload {
            mtime: 0,
            atime: 0,
            length: 0,
            uid,
            gid,
            mode_and_type: Mode::new(perm, is_dir),
        }
    }

    #[test]
    fn superuser_bypasses_permission_bits() {
        let node = node_with_mode(0o000, false, 1, 1);
        let req = Requester { uid: 99, gid: 99, groups: vec![], is_superuser: true };
        assert!(check_access(&node, Nid(1), &req, AccessBits::WRITE, true).is_ok());
    }

    #[test]
    fn owner_bits_checked_when_uid_matches() {
        let node = node_with_mode(0o100, false, 5, 5);
        let req = Requester { uid: 5, gid: 5, groups: vec![], is_superuser: false };
        assert!(check_access(&node, Nid(1), &req, AccessBits::EXEC, true).is_ok());
        assert!(check_access(&node, Nid(1), &req, AccessBits::WRITE, true).is_err());
    }

    #[test]
    fn world_bits_grant_access_regardless_of_identity() {
        let node = node_with_mode(0o400, false, 5, 5);
        let req = Requester { uid: 1, gid: 1, groups: vec![], is_superuser: false };
        assert!(check_access(&node, Nid(1), &req, AccessBits::READ, true).is_ok());
    }

    #[test]
    fn group_bits_checked_when_gid_matches() {
        let node = node_with_mode(0o020, false, 5, 7);
        let req = Requester { uid: 1, gid: 7, groups: vec![], is_superuser: false };
        assert!(check_access(&node, Nid(1), &req, AccessBits::WRITE, true).is_ok());
    }

    #[test]
    fn dir_mismatch_is_checked_even_without_perms() {
        let node = node_with_mode(0o777, false, 1, 1);
        let req = Requester { uid: 1, gid: 1, groups: vec![], is_superuser: false };
        let err = check_access(&node, Nid(1), &req, AccessBits::READ.requires_dir(), false);
        assert!(matches!(err, Err(MstorError::NotDir(_))));
    }

    #[test]
    fn check_perms_false_skips_permission_bits_but_not_type() {
        let node = node_with_mode(0o000, true, 1, 1);
        let req = Requester { uid: 99, gid: 99, groups: vec![], is_superuser: false };
        assert!(check_access(&node, Nid(1), &req, AccessBits::WRITE.requires_dir(), false).is_ok());
    }
}
