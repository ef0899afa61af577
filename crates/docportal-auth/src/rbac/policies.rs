//! The capability policy: who may do what to which entry.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docportal_entity::user::UserRole;

/// Actions the portal guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create a folder under a menu.
    CreateFolder,
    /// Upload a file under a menu.
    UploadFile,
    /// Rename or delete an existing folder or file.
    ModifyEntry,
    /// Download a stored file.
    DownloadFile,
    /// Administer user accounts.
    ManageUsers,
    /// Browse the activity log.
    ViewActivity,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateFolder => "create_folder",
            Self::UploadFile => "upload_file",
            Self::ModifyEntry => "modify_entry",
            Self::DownloadFile => "download_file",
            Self::ManageUsers => "manage_users",
            Self::ViewActivity => "view_activity",
        };
        f.write_str(name)
    }
}

/// The acting user as the policy sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's role.
    pub role: UserRole,
    /// Whether an admin has verified the account.
    pub verified: bool,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action must be refused.
    Deny,
}

impl Decision {
    /// Whether the decision allows the action.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluate a capability for an actor against an entry owned by `owner`.
///
/// `owner` is only consulted for [`Capability::ModifyEntry`]. Unverified
/// actors are denied everything.
pub fn evaluate(actor: &Actor, owner: Option<Uuid>, capability: Capability) -> Decision {
    if !actor.verified {
        return Decision::Deny;
    }

    let allowed = match capability {
        Capability::CreateFolder
        | Capability::UploadFile
        | Capability::ManageUsers
        | Capability::ViewActivity => actor.role.is_admin(),
        Capability::ModifyEntry => actor.role.is_admin() || owner == Some(actor.user_id),
        Capability::DownloadFile => true,
    };

    if allowed { Decision::Allow } else { Decision::Deny }
}
