//! The `Mstor` facade: bootstrap/recovery, the path-walker I/O loop, and
//! dispatch to the per-operation use cases. This is the one place in the
//! crate that holds a live `MetadataEngine` handle.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use mstor_domain::entities::node::NodePayload;
use mstor_domain::error::MstorError;
use mstor_domain::repositories::{BatchOp, MetadataEngine, UserDirectory};
use mstor_domain::services::id_allocator::IdAllocator;
use mstor_domain::services::key_codec::RecordKey;
use mstor_domain::services::path_walk::OperationKind;
use mstor_domain::services::permission::{check_access, Requester};
use mstor_domain::value_objects::ids::{Cid, Nid, ID_MAX};
use mstor_domain::value_objects::mode::{AccessBits, Mode, ROOT_INIT_MODE};
use mstor_domain::value_objects::path::{canonicalize, split_components};

use crate::application::services::requests::*;
use crate::application::use_cases;
use crate::infrastructure::config::MstorConfig;

const VERSION_MAGIC: &[u8; 4] = b"Fish";
const CUR_VERSION: u32 = 1;
const SUPERUSER_UID: u32 = 0;
const SUPERUSER_GID: u32 = 0;

/// Number of stripes in the per-node lock table guarding chmod/chown/
/// utimes/open read-modify-write updates against lost-update races — the
/// concurrency fix the original source leaves as a `TODO: take lock
/// here`.
const LOCK_STRIPES: usize = 256;

struct NodeLocks {
    stripes: Vec<Mutex<()>>,
}

impl NodeLocks {
    fn new() -> Self {
        NodeLocks {
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    fn lock(&self, nid: Nid) -> parking_lot::MutexGuard<'_, ()> {
        let idx = (nid.0 as usize) % self.stripes.len();
        self.stripes[idx].lock()
    }
}

pub struct ResolvedNode {
    pub nid: Nid,
    pub payload: NodePayload,
}

pub struct Mstor {
    pub(crate) engine: Arc<dyn MetadataEngine>,
    pub(crate) user_dir: Arc<dyn UserDirectory>,
    pub(crate) alloc: IdAllocator,
    pub(crate) config: MstorConfig,
    locks: NodeLocks,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl Mstor {
    pub fn open(
        engine: Arc<dyn MetadataEngine>,
        user_dir: Arc<dyn UserDirectory>,
        config: MstorConfig,
    ) -> Result<Self, MstorError> {
        let mut cursor = engine.seek(&[])?;
        let (next_nid, next_cid) = if !cursor.valid() {
            tracing::info!("formatting empty store");
            Self::format(engine.as_ref())?;
            (1u64, 1u64)
        } else {
            drop(cursor);
            Self::recover(engine.as_ref())?
        };
        tracing::info!(next_nid, next_cid, "mstor opened");
        Ok(Mstor {
            engine,
            user_dir,
            alloc: IdAllocator::new(next_nid, next_cid),
            config,
            locks: NodeLocks::new(),
        })
    }

    fn format(engine: &dyn MetadataEngine) -> Result<(), MstorError> {
        let mut version_body = Vec::with_capacity(8);
        version_body.extend_from_slice(VERSION_MAGIC);
        version_body.extend_from_slice(&CUR_VERSION.to_be_bytes());
        engine.put(&RecordKey::Version.encode(), &version_body)?;

        let t = now_secs();
        let root = NodePayload {
            mtime: t,
            atime: t,
            length: 0,
            uid: SUPERUSER_UID,
            gid: SUPERUSER_GID,
            mode_and_type: Mode(ROOT_INIT_MODE),
        };
        engine.put(&RecordKey::Node(Nid::ROOT).encode(), &root.encode())?;
        Ok(())
    }

    fn recover(engine: &dyn MetadataEngine) -> Result<(u64, u64), MstorError> {
        let raw = engine
            .get(&RecordKey::Version.encode())?
            .ok_or_else(|| MstorError::corruption("missing version record"))?;
        if raw.len() != 8 || &raw[0..4] != VERSION_MAGIC {
            return Err(MstorError::IncompatibleVersion(
                "bad version magic".to_string(),
            ));
        }
        let version = u32::from_be_bytes(raw[4..8].try_into().unwrap());
        if version != CUR_VERSION {
            return Err(MstorError::IncompatibleVersion(format!(
                "on-disk version {version}, expected {CUR_VERSION}"
            )));
        }

        let next_nid = Self::recover_ceiling(engine, &RecordKey::Node(Nid(ID_MAX)).encode())?;
        let next_cid =
            Self::recover_ceiling(engine, &RecordKey::ChunkReplicas(Cid(ID_MAX)).encode())?;
        Ok((next_nid, next_cid))
    }

    /// Seek to `ceiling_key` (one past the highest possible id in its
    /// family) and step back to find the highest id actually in use.
    fn recover_ceiling(engine: &dyn MetadataEngine, ceiling_key: &[u8]) -> Result<u64, MstorError> {
        let mut cursor = engine.seek(ceiling_key)?;
        // `seek` lands at-or-after the ceiling key; step back to the
        // highest key strictly below it.
        if cursor.valid() && cursor.key() == Some(ceiling_key) {
            cursor.next();
        }
        cursor.prev();
        if !cursor.valid() {
            return Ok(1);
        }
        let key = cursor.key().unwrap();
        match RecordKey::decode(key) {
            Ok(RecordKey::Node(nid)) => Ok(nid.0 + 1),
            Ok(RecordKey::ChunkReplicas(cid)) => Ok(cid.0 + 1),
            _ => Ok(1),
        }
    }

    fn requester_for(&self, user_name: &str) -> Result<Requester, MstorError> {
        let user = self.user_dir.lookup_user(user_name)?;
        Ok(Requester {
            uid: user.uid,
            gid: user.gid,
            groups: user.groups,
            is_superuser: user.uid == SUPERUSER_UID,
        })
    }

    pub(crate) fn fetch_node(&self, nid: Nid) -> Result<NodePayload, MstorError> {
        let raw = self
            .engine
            .get(&RecordKey::Node(nid).encode())?
            .ok_or_else(|| MstorError::not_found(nid.to_string()))?;
        NodePayload::decode(&raw)
    }

    pub(crate) fn fetch_child(&self, parent: Nid, name: &str) -> Result<ResolvedNode, MstorError> {
        let raw = self
            .engine
            .get(&RecordKey::Child(parent, name.to_string()).encode())?
            .ok_or_else(|| MstorError::not_found(name.to_string()))?;
        if raw.len() != 8 {
            return Err(MstorError::corruption("child record has wrong length"));
        }
        let nid = Nid(u64::from_be_bytes(raw.try_into().unwrap()));
        let payload = self.fetch_node(nid)?;
        Ok(ResolvedNode { nid, payload })
    }

    pub(crate) fn lock_node(&self, nid: Nid) -> parking_lot::MutexGuard<'_, ()> {
        self.locks.lock(nid)
    }

    /// Walk `path`'s components from the root, dispatching to `op` at the
    /// terminal step. Mirrors `mstor_do_path_operation`: intermediate
    /// steps require `EXEC|IS_DIR`, `mkdirs` synthesizes missing
    /// ancestors and clears the permission-check flag for the rest of the
    /// walk once it does, and `creat` is only allowed to create at the
    /// final component.
    ///
    /// `at_terminal` is called in one of two shapes, distinguished by its
    /// final `bool` (`found`):
    /// * `found == false` (terminal component missing, and `op` creates
    ///   entries): called as `(grandparent, parent_dir, name, false)` —
    ///   `parent_dir` is the directory the new entry belongs in, `name`
    ///   the entry to create.
    /// * `found == true` (terminal component resolved): called as
    ///   `(parent, node, name, true)`, `name` being the resolved node's
    ///   own basename (empty only for the root directory, which has
    ///   none).
    fn walk<T>(
        &self,
        requester: &Requester,
        full_path: &str,
        op: OperationKind,
        ancestor_mode: Option<(u16, u64)>,
        at_terminal: impl FnOnce(&Self, &Requester, bool, Option<ResolvedNode>, ResolvedNode, &str, bool) -> Result<T, MstorError>,
    ) -> Result<T, MstorError> {
        let canon = canonicalize(full_path)?;
        let components = split_components(&canon)?;

        let mut check_perms = !requester.is_superuser;
        let mut parent: Option<ResolvedNode> = None;
        let mut current = ResolvedNode {
            nid: Nid::ROOT,
            payload: self.fetch_node(Nid::ROOT)?,
        };
        let mut current_name: &str = "";

        let n = components.len();
        for (i, comp) in components.iter().enumerate() {
            let is_last = i + 1 == n;
            if !is_last {
                check_access(
                    &current.payload,
                    current.nid,
                    requester,
                    OperationKind::intermediate_access(),
                    check_perms,
                )?;
            }

            match self.fetch_child(current.nid, comp) {
                Ok(child) => {
                    parent = Some(current);
                    current = child;
                    current_name = comp;
                }
                Err(MstorError::NotFound(_)) => {
                    if is_last && op.creates_terminal_entry() {
                        return at_terminal(self, requester, check_perms, parent, current, comp, false);
                    }
                    if op.auto_creates_ancestors() {
                        check_access(
                            &current.payload,
                            current.nid,
                            requester,
                            AccessBits::WRITE.requires_dir(),
                            check_perms,
                        )?;
                        let (mode, ctime) = ancestor_mode
                            .expect("mkdirs always supplies an ancestor mode/ctime");
                        let created = use_cases::mkdirs::create_ancestor(
                            self, requester, current.nid, comp, mode, ctime,
                        )?;
                        // Don't re-check permissions on directories we
                        // just created ourselves.
                        check_perms = false;
                        parent = Some(current);
                        current = created;
                        current_name = comp;
                        continue;
                    }
                    return Err(MstorError::not_found(comp.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        at_terminal(self, requester, check_perms, parent, current, current_name, true)
    }

    pub fn creat(&self, req: &CreatRequest) -> Result<ResolvedNode, MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Creat,
            None,
            |mstor, requester, check_perms, parent, existing_or_placeholder, comp, found| {
                use_cases::creat::run(
                    mstor,
                    requester,
                    check_perms,
                    parent,
                    existing_or_placeholder,
                    comp,
                    found,
                    req.mode,
                    req.ctime,
                )
            },
        )
    }

    pub fn mkdirs(&self, req: &MkdirsRequest) -> Result<(), MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Mkdirs,
            Some((req.mode, req.ctime)),
            |mstor, requester, check_perms, parent, existing_or_placeholder, comp, found| {
                use_cases::mkdirs::run(
                    mstor,
                    requester,
                    check_perms,
                    parent,
                    existing_or_placeholder,
                    comp,
                    found,
                    req.mode,
                    req.ctime,
                )
            },
        )
        .map(|_| ())
    }

    pub fn open_file(&self, req: &OpenRequest) -> Result<ResolvedNode, MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Open,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::open::run(mstor, requester, check_perms, node, req.atime)
            },
        )
    }

    pub fn listdir(&self, req: &ListdirRequest) -> Result<Vec<mstor_domain::services::payload_codec::StatRecord>, MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Listdir,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::listdir::run(mstor, requester, check_perms, node)
            },
        )
    }

    pub fn stat(&self, req: &StatRequest) -> Result<mstor_domain::services::payload_codec::StatRecord, MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        let full_path = req.base.full_path.clone();
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Stat,
            None,
            move |mstor, requester, check_perms, parent, node, _comp, _found| {
                use_cases::stat::run(mstor, requester, check_perms, parent, node, &full_path)
            },
        )
    }

    pub fn chmod(&self, req: &ChmodRequest) -> Result<(), MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Chmod,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::chmod::run(mstor, requester, check_perms, node, req.mode)
            },
        )
    }

    pub fn chown(&self, req: &ChownRequest) -> Result<(), MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Chown,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::chown::run(
                    mstor,
                    requester,
                    check_perms,
                    node,
                    req.new_user.as_deref(),
                    req.new_group.as_deref(),
                )
            },
        )
    }

    pub fn utimes(&self, req: &UtimesRequest) -> Result<(), MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Utimes,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::utimes::run(mstor, requester, check_perms, node, req.atime, req.mtime)
            },
        )
    }

    pub fn rmdir(&self, req: &RmdirRequest) -> Result<(), MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::Rmdir,
            None,
            |mstor, requester, check_perms, parent, node, comp, found| {
                use_cases::rmdir::run(mstor, requester, check_perms, parent, node, comp, found, req.recursive)
            },
        )
    }

    pub fn chunkfind(&self, req: &ChunkFindRequest) -> Result<Vec<ChunkInfo>, MstorError> {
        let requester = self.requester_for(&req.base.user_name)?;
        self.walk(
            &requester,
            &req.base.full_path,
            OperationKind::ChunkFind,
            None,
            |mstor, requester, check_perms, _parent, node, _comp, _found| {
                use_cases::chunkfind::run(
                    mstor,
                    requester,
                    check_perms,
                    node,
                    req.start,
                    req.end,
                    req.max_chunks,
                )
            },
        )
    }

    /// `chunkalloc` is addressed directly by nid, bypassing the path
    /// walker entirely — the original dispatches it before ever touching
    /// `mstor_do_path_operation`.
    pub fn chunkalloc(&self, req: &ChunkAllocRequest) -> Result<ChunkAllocResult, MstorError> {
        let requester = self.requester_for(&req.user_name)?;
        use_cases::chunkalloc::run(self, &requester, req.nid, req.off)
    }

    pub fn dump(&self, out: &mut impl std::io::Write) -> Result<(), MstorError> {
        crate::application::services::dumper::dump(self, out)
    }
}
