//! `listdir(path)` — list the children of a directory as a stream of
//! stat records. Grounded on `mstor_do_listdir` in the original source.

use mstor_domain::error::MstorError;
use mstor_domain::repositories::MetadataEngine;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::payload_codec::StatRecord;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::mode::AccessBits;

use crate::application::services::mstor_service::{Mstor, ResolvedNode};

pub fn run(
    mstor: &Mstor,
    requester: &Requester,
    check_perms: bool,
    dir: ResolvedNode,
) -> Result<Vec<StatRecord>, MstorError> {
    check_access(
        &dir.payload,
        dir.nid,
        requester,
        AccessBits::READ.requires_dir(),
        check_perms,
    )?;

    let man_repl = mstor.config.man_repl as u8;
    let prefix = RecordKey::child_prefix(dir.nid);
    let mut out = Vec::new();
    let mut cursor = mstor.engine.seek(&prefix)?;
    while cursor.valid() {
        let key = cursor.key().expect("valid cursor has a key").to_vec();
        if !key.starts_with(&prefix) {
            break;
        }
        match RecordKey::decode(&key)? {
            RecordKey::Child(parent, name) if parent == dir.nid => {
                let raw = cursor.value().ok_or_else(|| {
                    MstorError::corruption("child record missing value")
                })?;
                if raw.len() != 8 {
                    return Err(MstorError::corruption("child record has wrong length"));
                }
                let nid = mstor_domain::value_objects::ids::Nid(u64::from_be_bytes(
                    raw.try_into().unwrap(),
                ));
                let child = mstor.fetch_node(nid)?;
                out.push(StatRecord::from_node(&name, &child, man_repl));
            }
            _ => break,
        }
        cursor.next();
    }
    Ok(out)
}
