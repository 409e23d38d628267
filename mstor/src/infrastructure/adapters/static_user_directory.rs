//! A minimal in-memory [`UserDirectory`]. Good enough to bootstrap and
//! test against; the production directory service (LDAP, a central user
//! service, etc.) is external and out of scope for this crate.

use std::collections::HashMap;

use mstor_domain::error::MstorError;
use mstor_domain::repositories::{GroupRecord, UserDirectory, UserRecord};

pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
    groups: HashMap<String, GroupRecord>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        StaticUserDirectory {
            users: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    pub fn with_user(mut self, name: impl Into<String>, record: UserRecord) -> Self {
        self.users.insert(name.into(), record);
        self
    }

    pub fn with_group(mut self, name: impl Into<String>, record: GroupRecord) -> Self {
        self.groups.insert(name.into(), record);
        self
    }
}

impl Default for StaticUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for StaticUserDirectory {
    fn lookup_user(&self, name: &str) -> Result<UserRecord, MstorError> {
        self.users
            .get(name)
            .cloned()
            .ok_or_else(|| MstorError::no_such_user(name.to_string()))
    }

    fn lookup_group(&self, name: &str) -> Result<GroupRecord, MstorError> {
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| MstorError::no_such_user(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_is_an_error() {
        let dir = StaticUserDirectory::new();
        assert!(dir.lookup_user("nobody").is_err());
    }

    #[test]
    fn seeded_user_is_found() {
        let dir = StaticUserDirectory::new().with_user(
            "alice",
            UserRecord {
                uid: 1000,
                gid: 1000,
                groups: vec![1000, 20],
            },
        );
        let u = dir.lookup_user("alice").unwrap();
        assert_eq!(u.uid, 1000);
        assert!(u.groups.contains(&20));
    }
}
