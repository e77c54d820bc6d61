//! Static access matrix
//!
//! Every guarded endpoint asks one question: may this principal perform
//! `action` on `entity`? The answer is a lookup in [`requirement`] followed by
//! a check against the principal's role, group permissions or ownership.
//!
//! | Entity           | List    | Retrieve   | Create       | Update       | Delete       |
//! |------------------|---------|------------|--------------|--------------|--------------|
//! | Book, Author     | Anyone  | Anyone     | Authenticated| Authenticated| Authenticated|
//! | ShelfBook        | Anyone  | can_view   | can_create   | can_edit     | can_delete   |
//! | Library          | Anyone  | Anyone     | Admin/Librarian | Admin/Librarian | Admin    |
//! | Post, Comment    | Anyone  | Anyone     | Authenticated| Owner        | Owner        |
//! | GroupMembership, UserRole | Superuser for every action                              |

use folio_common::types::{PermissionCode, Role};

use super::Principal;

/// Resource kinds guarded by the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Book,
    Author,
    ShelfBook,
    Library,
    Post,
    Comment,
    GroupMembership,
    UserRole,
}

impl Entity {
    fn plural(self) -> &'static str {
        match self {
            Entity::Book | Entity::ShelfBook => "books",
            Entity::Author => "authors",
            Entity::Library => "libraries",
            Entity::Post => "posts",
            Entity::Comment => "comments",
            Entity::GroupMembership => "user groups",
            Entity::UserRole => "user roles",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            Entity::Book | Entity::ShelfBook => "book",
            Entity::Author => "author",
            Entity::Library => "library",
            Entity::Post => "post",
            Entity::Comment => "comment",
            Entity::GroupMembership => "user group",
            Entity::UserRole => "user role",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "view",
            Action::Create => "create",
            Action::Update => "edit",
            Action::Delete => "delete",
        }
    }
}

/// What a caller must satisfy for one `(entity, action)` cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Anyone,
    Authenticated,
    Permission(PermissionCode),
    AnyRole(&'static [Role]),
    Owner,
    Superuser,
}

const LIBRARY_STAFF: &[Role] = &[Role::Admin, Role::Librarian];
const LIBRARY_ADMIN: &[Role] = &[Role::Admin];

/// Look up the requirement for an entity/action pair
pub fn requirement(entity: Entity, action: Action) -> Requirement {
    use Action::*;
    use Requirement::*;

    match (entity, action) {
        (Entity::GroupMembership | Entity::UserRole, _) => Superuser,
        (_, List) => Anyone,

        (Entity::Book | Entity::Author, Retrieve) => Anyone,
        (Entity::Book | Entity::Author, Create | Update | Delete) => Authenticated,

        (Entity::ShelfBook, Retrieve) => Permission(PermissionCode::CanView),
        (Entity::ShelfBook, Create) => Permission(PermissionCode::CanCreate),
        (Entity::ShelfBook, Update) => Permission(PermissionCode::CanEdit),
        (Entity::ShelfBook, Delete) => Permission(PermissionCode::CanDelete),

        (Entity::Library, Retrieve) => Anyone,
        (Entity::Library, Create | Update) => AnyRole(LIBRARY_STAFF),
        (Entity::Library, Delete) => AnyRole(LIBRARY_ADMIN),

        (Entity::Post | Entity::Comment, Retrieve) => Anyone,
        (Entity::Post | Entity::Comment, Create) => Authenticated,
        (Entity::Post | Entity::Comment, Update | Delete) => Owner,
    }
}

/// Why an access check failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// No usable credentials were presented
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,
    /// Authenticated, but not allowed; carries the user-facing message
    #[error("{0}")]
    Forbidden(String),
}

/// Message returned with a 403 for the given cell
pub fn denial_message(entity: Entity, action: Action) -> String {
    match (entity, action, requirement(entity, action)) {
        (Entity::ShelfBook, Action::Retrieve, _) => {
            "You do not have permission to view book details.".to_string()
        },
        (_, _, Requirement::Owner) => format!(
            "You do not have permission to {} this {}.",
            action.verb(),
            entity.singular()
        ),
        _ => format!(
            "You do not have permission to {} {}.",
            action.verb(),
            entity.plural()
        ),
    }
}

/// Decide whether `principal` may perform `action` on `entity`
///
/// `owner_id` is the user id owning the target row; it only matters for
/// [`Requirement::Owner`] cells. Superusers bypass permission, role and
/// superuser checks, never ownership.
pub fn authorize(
    principal: Option<&Principal>,
    entity: Entity,
    action: Action,
    owner_id: Option<i64>,
) -> Result<(), AccessDenied> {
    let required = requirement(entity, action);
    if required == Requirement::Anyone {
        return Ok(());
    }

    let principal = match principal {
        Some(p) if p.is_active => p,
        _ => return Err(AccessDenied::Unauthenticated),
    };

    let allowed = match required {
        Requirement::Anyone | Requirement::Authenticated => true,
        Requirement::Permission(code) => principal.is_superuser || principal.has_permission(code),
        Requirement::AnyRole(roles) => principal.is_superuser || roles.contains(&principal.role),
        Requirement::Owner => owner_id == Some(principal.id),
        Requirement::Superuser => principal.is_superuser,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            user_id = principal.id,
            ?entity,
            ?action,
            ?required,
            "Access denied"
        );
        Err(AccessDenied::Forbidden(denial_message(entity, action)))
    }
}

// ============================================================================
// Role predicates
// ============================================================================

fn has_role(principal: Option<&Principal>, role: Role) -> bool {
    principal.is_some_and(|p| p.is_active && p.role == role)
}

pub fn is_admin(principal: Option<&Principal>) -> bool {
    has_role(principal, Role::Admin)
}

pub fn is_librarian(principal: Option<&Principal>) -> bool {
    has_role(principal, Role::Librarian)
}

pub fn is_member(principal: Option<&Principal>) -> bool {
    has_role(principal, Role::Member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::types::GroupName;

    fn user(id: i64, role: Role, groups: &[GroupName]) -> Principal {
        Principal {
            id,
            username: format!("user{id}"),
            role,
            is_superuser: false,
            is_active: true,
            groups: groups.iter().map(|g| g.as_str().to_string()).collect(),
            permissions: groups.iter().flat_map(|g| g.grants().iter().copied()).collect(),
        }
    }

    fn superuser(id: i64) -> Principal {
        Principal {
            is_superuser: true,
            ..user(id, Role::Member, &[])
        }
    }

    const ACTIONS: [Action; 5] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    #[test]
    fn test_everything_is_listable_except_account_administration() {
        for entity in [
            Entity::Book,
            Entity::Author,
            Entity::ShelfBook,
            Entity::Library,
            Entity::Post,
            Entity::Comment,
        ] {
            assert_eq!(authorize(None, entity, Action::List, None), Ok(()));
        }
        for entity in [Entity::GroupMembership, Entity::UserRole] {
            assert_eq!(
                authorize(None, entity, Action::List, None),
                Err(AccessDenied::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_anonymous_writes_are_unauthenticated() {
        for entity in [Entity::Book, Entity::Author, Entity::Post, Entity::Comment] {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(
                    authorize(None, entity, action, Some(1)),
                    Err(AccessDenied::Unauthenticated),
                    "{entity:?} {action:?}"
                );
            }
        }
    }

    #[test]
    fn test_catalog_requires_only_authentication() {
        let member = user(1, Role::Member, &[]);
        for action in ACTIONS {
            assert!(authorize(Some(&member), Entity::Book, action, None).is_ok());
            assert!(authorize(Some(&member), Entity::Author, action, None).is_ok());
        }
    }

    #[test]
    fn test_shelf_permissions_follow_groups() {
        let viewer = user(1, Role::Member, &[GroupName::Viewers]);
        let editor = user(2, Role::Member, &[GroupName::Editors]);
        let admin = user(3, Role::Member, &[GroupName::Admins]);
        let nobody = user(4, Role::Member, &[]);

        let check = |p: &Principal, action| authorize(Some(p), Entity::ShelfBook, action, None).is_ok();

        assert!(check(&viewer, Action::Retrieve));
        assert!(!check(&viewer, Action::Create));
        assert!(!check(&viewer, Action::Update));
        assert!(!check(&viewer, Action::Delete));

        assert!(check(&editor, Action::Retrieve));
        assert!(check(&editor, Action::Create));
        assert!(check(&editor, Action::Update));
        assert!(!check(&editor, Action::Delete));

        for action in ACTIONS {
            assert!(check(&admin, action));
        }

        assert!(check(&nobody, Action::List));
        assert!(!check(&nobody, Action::Retrieve));
    }

    #[test]
    fn test_shelf_denial_messages() {
        let nobody = user(4, Role::Member, &[]);
        let message = |action| match authorize(Some(&nobody), Entity::ShelfBook, action, None) {
            Err(AccessDenied::Forbidden(m)) => m,
            other => panic!("expected forbidden, got {other:?}"),
        };

        assert_eq!(message(Action::Retrieve), "You do not have permission to view book details.");
        assert_eq!(message(Action::Create), "You do not have permission to create books.");
        assert_eq!(message(Action::Update), "You do not have permission to edit books.");
        assert_eq!(message(Action::Delete), "You do not have permission to delete books.");

        let denied = authorize(Some(&nobody), Entity::ShelfBook, Action::Delete, None).unwrap_err();
        assert_eq!(denied.to_string(), "You do not have permission to delete books.");
        assert_eq!(
            AccessDenied::Unauthenticated.to_string(),
            "Authentication credentials were not provided."
        );
    }

    #[test]
    fn test_superuser_bypasses_permissions_and_roles() {
        let root = superuser(9);
        for action in ACTIONS {
            assert!(authorize(Some(&root), Entity::ShelfBook, action, None).is_ok());
            assert!(authorize(Some(&root), Entity::Library, action, None).is_ok());
            assert!(authorize(Some(&root), Entity::GroupMembership, action, None).is_ok());
        }
    }

    #[test]
    fn test_superuser_does_not_bypass_ownership() {
        let root = superuser(9);
        assert!(matches!(
            authorize(Some(&root), Entity::Post, Action::Update, Some(1)),
            Err(AccessDenied::Forbidden(_))
        ));
        assert!(authorize(Some(&root), Entity::Post, Action::Update, Some(9)).is_ok());
    }

    #[test]
    fn test_ownership() {
        let author = user(1, Role::Member, &[]);
        let other = user(2, Role::Member, &[]);

        for entity in [Entity::Post, Entity::Comment] {
            for action in [Action::Update, Action::Delete] {
                assert!(authorize(Some(&author), entity, action, Some(1)).is_ok());
                assert!(authorize(Some(&other), entity, action, Some(1)).is_err());
                assert!(authorize(Some(&author), entity, action, None).is_err());
            }
        }

        assert_eq!(
            authorize(Some(&other), Entity::Comment, Action::Delete, Some(1)),
            Err(AccessDenied::Forbidden(
                "You do not have permission to delete this comment.".to_string()
            ))
        );
    }

    #[test]
    fn test_library_roles() {
        let admin = user(1, Role::Admin, &[]);
        let librarian = user(2, Role::Librarian, &[]);
        let member = user(3, Role::Member, &[]);
        let check = |p: &Principal, action| authorize(Some(p), Entity::Library, action, None).is_ok();

        assert!(check(&admin, Action::Create));
        assert!(check(&admin, Action::Delete));
        assert!(check(&librarian, Action::Create));
        assert!(check(&librarian, Action::Update));
        assert!(!check(&librarian, Action::Delete));
        assert!(!check(&member, Action::Create));
        assert!(check(&member, Action::Retrieve));
    }

    #[test]
    fn test_inactive_user_is_unauthenticated() {
        let mut admin = user(1, Role::Admin, &[GroupName::Admins]);
        admin.is_active = false;
        assert_eq!(
            authorize(Some(&admin), Entity::Book, Action::Create, None),
            Err(AccessDenied::Unauthenticated)
        );
        assert!(!is_admin(Some(&admin)));
    }

    #[test]
    fn test_role_predicates() {
        let librarian = user(1, Role::Librarian, &[]);
        assert!(is_librarian(Some(&librarian)));
        assert!(!is_admin(Some(&librarian)));
        assert!(!is_member(Some(&librarian)));
        assert!(!is_member(None));
    }
}
