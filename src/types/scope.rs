use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The visibility boundary every repository read and write runs under.
///
/// Resolved once per request from the acting user and passed down
/// explicitly; repositories never re-derive it from a raw user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Rows shared by every member of the workspace.
    Workspace(Uuid),
    /// The user's private rows: `workspace_id IS NULL AND created_by = user`.
    Solo(Uuid),
}

impl Scope {
    /// The stamp new rows receive. `None` means solo.
    pub fn workspace_id(&self) -> Option<Uuid> {
        match self {
            Scope::Workspace(id) => Some(*id),
            Scope::Solo(_) => None,
        }
    }
}

/// Derived from workspace state on every call, never stored. Keeping this a
/// pure computation means an ownership transfer can't leave a stale role
/// behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Solo,
    Owner,
    Member,
}

impl Role {
    /// Owners and solo users delete anything in their scope; members only
    /// rows they created. The one asymmetric permission in the system.
    pub fn can_delete(self, created_by: Uuid, user_id: Uuid) -> bool {
        match self {
            Role::Solo | Role::Owner => true,
            Role::Member => created_by == user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_deletes_only_own_rows() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(Role::Member.can_delete(me, me));
        assert!(!Role::Member.can_delete(other, me));
        assert!(Role::Owner.can_delete(other, me));
        assert!(Role::Solo.can_delete(me, me));
    }

    #[test]
    fn solo_scope_carries_no_workspace_stamp() {
        let user = Uuid::new_v4();
        let ws = Uuid::new_v4();
        assert_eq!(Scope::Solo(user).workspace_id(), None);
        assert_eq!(Scope::Workspace(ws).workspace_id(), Some(ws));
    }
}
