//! The user-directory collaborator port (§6): resolves user/group names to
//! numeric ids. The production directory service lives outside this
//! crate; callers supply whatever `UserDirectory` implementation fits
//! their deployment.

use crate::error::MstorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uid: u32,
    pub gid: u32,
    pub groups: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub gid: u32,
}

pub trait UserDirectory: Send + Sync {
    fn lookup_user(&self, name: &str) -> Result<UserRecord, MstorError>;
    fn lookup_group(&self, name: &str) -> Result<GroupRecord, MstorError>;
}
