use folio_common::types::Role;
use serde::{Deserialize, Serialize};

use crate::auth::access::{is_admin, is_librarian, is_member};
use crate::auth::Principal;

/// Body of a role landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePage {
    pub role: Role,
    pub message: String,
}

/// The page for `role`, or `None` when the caller holds a different role
pub fn role_page(principal: &Principal, role: Role) -> Option<RolePage> {
    let allowed = match role {
        Role::Admin => is_admin(Some(principal)),
        Role::Librarian => is_librarian(Some(principal)),
        Role::Member => is_member(Some(principal)),
    };

    allowed.then(|| RolePage {
        role,
        message: format!("Welcome, {}. This is the {role} page.", principal.username),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            username: "marian".into(),
            role,
            is_superuser: false,
            is_active: true,
            groups: Vec::new(),
            permissions: BTreeSet::new(),
        }
    }

    #[test]
    fn test_only_matching_role_gets_page() {
        let librarian = principal(Role::Librarian);
        let page = role_page(&librarian, Role::Librarian).unwrap();
        assert_eq!(page.role, Role::Librarian);
        assert_eq!(page.message, "Welcome, marian. This is the Librarian page.");

        assert!(role_page(&librarian, Role::Admin).is_none());
        assert!(role_page(&librarian, Role::Member).is_none());
    }

    #[test]
    fn test_superuser_flag_does_not_grant_roles() {
        let mut member = principal(Role::Member);
        member.is_superuser = true;
        assert!(role_page(&member, Role::Admin).is_none());
    }
}
