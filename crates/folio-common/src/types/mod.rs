//! Role, group and permission vocabulary
//!
//! Two independent authorization axes exist side by side:
//!
//! - a **role** stored on every user profile (`Admin`, `Librarian`, `Member`),
//!   used by the library role pages and library management;
//! - **group permissions** (`can_view`, `can_create`, `can_edit`, `can_delete`)
//!   granted through the `Viewers`, `Editors` and `Admins` groups, used by the
//!   bookshelf endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// Library role assigned to a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    Admin,
    Librarian,
    #[default]
    Member,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Librarian, Role::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "librarian" => Ok(Role::Librarian),
            "member" => Ok(Role::Member),
            _ => Err(FolioError::InvalidRole(s.to_string())),
        }
    }
}

/// Named bookshelf permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCode {
    CanView,
    CanCreate,
    CanEdit,
    CanDelete,
}

impl PermissionCode {
    pub const ALL: [PermissionCode; 4] = [
        PermissionCode::CanView,
        PermissionCode::CanCreate,
        PermissionCode::CanEdit,
        PermissionCode::CanDelete,
    ];

    /// Codename as stored in `group_permissions.codename`
    pub fn codename(&self) -> &'static str {
        match self {
            PermissionCode::CanView => "can_view",
            PermissionCode::CanCreate => "can_create",
            PermissionCode::CanEdit => "can_edit",
            PermissionCode::CanDelete => "can_delete",
        }
    }

    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            PermissionCode::CanView => "Can view a book",
            PermissionCode::CanCreate => "Can create a book",
            PermissionCode::CanEdit => "Can edit a book",
            PermissionCode::CanDelete => "Can delete a book",
        }
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

impl FromStr for PermissionCode {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both "can_edit" and the app-qualified "bookshelf.can_edit"
        let codename = s.rsplit('.').next().unwrap_or(s);
        PermissionCode::ALL
            .into_iter()
            .find(|p| p.codename() == codename)
            .ok_or_else(|| FolioError::InvalidPermission(s.to_string()))
    }
}

/// Permission group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupName {
    Viewers,
    Editors,
    Admins,
}

impl GroupName {
    pub const ALL: [GroupName; 3] = [GroupName::Viewers, GroupName::Editors, GroupName::Admins];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupName::Viewers => "Viewers",
            GroupName::Editors => "Editors",
            GroupName::Admins => "Admins",
        }
    }

    /// Permissions every member of the group receives
    pub fn grants(&self) -> &'static [PermissionCode] {
        use PermissionCode::*;
        match self {
            GroupName::Viewers => &[CanView],
            GroupName::Editors => &[CanView, CanCreate, CanEdit],
            GroupName::Admins => &[CanView, CanCreate, CanEdit, CanDelete],
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupName {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupName::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FolioError::InvalidGroup(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_is_case_insensitive() {
        assert_eq!("librarian".parse::<Role>().unwrap(), Role::Librarian);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Member.to_string(), "Member");
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_permission_accepts_qualified_codename() {
        assert_eq!(
            "bookshelf.can_delete".parse::<PermissionCode>().unwrap(),
            PermissionCode::CanDelete
        );
        assert_eq!("can_view".parse::<PermissionCode>().unwrap(), PermissionCode::CanView);
        assert!("can_fly".parse::<PermissionCode>().is_err());
    }

    #[test]
    fn test_group_grants_are_nested() {
        let viewers = GroupName::Viewers.grants();
        let editors = GroupName::Editors.grants();
        let admins = GroupName::Admins.grants();

        assert!(viewers.iter().all(|p| editors.contains(p)));
        assert!(editors.iter().all(|p| admins.contains(p)));
        assert!(!editors.contains(&PermissionCode::CanDelete));
        assert_eq!(admins.len(), 4);
    }

    #[test]
    fn test_group_parse() {
        assert_eq!("editors".parse::<GroupName>().unwrap(), GroupName::Editors);
        assert!("Writers".parse::<GroupName>().is_err());
    }
}
