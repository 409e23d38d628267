//! `stat(path)` — read a node's metadata without otherwise touching it.
//! Grounded on `mstor_do_stat` in the original source.

use mstor_domain::error::MstorError;
use mstor_domain::services::payload_codec::StatRecord;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::mode::AccessBits;
use mstor_domain::value_objects::path::{canonicalize, split_components};

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

/// The basename of a resolved path, or `""` for the root directory — the
/// walker itself only tracks the resolved node, not the component string
/// that led to it, so `stat` recovers the name from the original path.
fn basename(full_path: &str) -> Result<String, MstorError> {
    let canon = canonicalize(full_path)?;
    let comps = split_components(&canon)?;
    Ok(comps.last().map(|s| s.to_string()).unwrap_or_default())
}

/// `mstor_do_stat` checks `MSTOR_PERM_READ | MNODE_IS_DIR` on the parent
/// directory whenever the target isn't root (root has no parent to check).
pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    parent: Option<ResolvedNode>,
    node: ResolvedNode,
    full_path: &str,
) -> Result<StatRecord, MstorError> {
    if let Some(parent) = &parent {
        check_access(
            &parent.payload,
            parent.nid,
            requester,
            AccessBits::READ.requires_dir(),
            check_perms,
        )?;
    }
    let name = basename(full_path)?;
    let man_repl = mstor.config.man_repl as u8;
    Ok(StatRecord::from_node(&name, &node.payload, man_repl))
}
