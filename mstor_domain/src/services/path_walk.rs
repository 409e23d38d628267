//! The non-I/O part of the path walker: which access is required at each
//! intermediate directory, and which operations get to auto-create missing
//! ancestors. The I/O loop itself (fetching children, dispatching to use
//! cases) lives in `mstor::application::services::mstor_service`, which is
//! the only place that needs a `MetadataEngine` handle.

use crate::value_objects::mode::AccessBits;

/// Every operation the path walker can dispatch to, mirroring
/// `enum mstor_op_ty` minus the reserved/unsupported tree-sequester family
/// (those are recognized by the codec but never reach a handler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Creat,
    Open,
    ChunkFind,
    Mkdirs,
    Listdir,
    Stat,
    Chmod,
    Chown,
    Utimes,
    Rmdir,
}

impl OperationKind {
    /// Access required of every intermediate directory traversed on the
    /// way to the terminal component: execute permission on a directory.
    pub fn intermediate_access() -> AccessBits {
        AccessBits::EXEC.requires_dir()
    }

    /// Whether a `NotFound` at an intermediate step should cause this
    /// operation to synthesize the missing directory and continue,
    /// instead of failing the whole walk.
    pub fn auto_creates_ancestors(self) -> bool {
        matches!(self, OperationKind::Mkdirs)
    }

    /// Whether a `NotFound` at the terminal component is itself the
    /// success path for this operation (i.e. the thing being "found" is
    /// the absence of an entry to create).
    pub fn creates_terminal_entry(self) -> bool {
        matches!(self, OperationKind::Creat | OperationKind::Mkdirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mkdirs_auto_creates_ancestors() {
        assert!(OperationKind::Mkdirs.auto_creates_ancestors());
        assert!(!OperationKind::Creat.auto_creates_ancestors());
        assert!(!OperationKind::Stat.auto_creates_ancestors());
    }

    #[test]
    fn intermediate_access_is_exec_on_a_directory() {
        let bits = OperationKind::intermediate_access();
        assert!(bits.wants_dir());
        assert_eq!(bits.perm_bits(), crate::value_objects::mode::PERM_EXEC);
    }
}
