//! Turns policy denials into errors before any mutation runs.

use uuid::Uuid;

use docportal_core::error::AppError;

use super::policies::{Actor, Capability, Decision, evaluate};

/// Enforces the capability policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Require a capability that does not depend on an entry owner.
    pub fn require(&self, actor: &Actor, capability: Capability) -> Result<(), AppError> {
        self.require_on(actor, None, capability)
    }

    /// Require a capability on an entry owned by `owner`.
    pub fn require_on(
        &self,
        actor: &Actor,
        owner: Option<Uuid>,
        capability: Capability,
    ) -> Result<(), AppError> {
        match evaluate(actor, owner, capability) {
            Decision::Allow => Ok(()),
            Decision::Deny if !actor.verified => Err(AppError::authorization(
                "Account is pending verification",
            )),
            Decision::Deny => {
                tracing::debug!(
                    user_id = %actor.user_id,
                    role = %actor.role,
                    %capability,
                    "Capability denied"
                );
                Err(AppError::authorization(
                    "You are not authorized to perform this action",
                ))
            }
        }
    }

    /// Whether the capability would be allowed; used for view flags.
    pub fn allows(&self, actor: &Actor, owner: Option<Uuid>, capability: Capability) -> bool {
        evaluate(actor, owner, capability).is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docportal_core::error::ErrorKind;
    use docportal_entity::user::UserRole;

    #[test]
    fn test_denial_is_forbidden() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
            verified: true,
        };
        let err = RbacEnforcer::new()
            .require(&actor, Capability::UploadFile)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_pending_account_message() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
            verified: false,
        };
        let err = RbacEnforcer::new()
            .require(&actor, Capability::ManageUsers)
            .unwrap_err();
        assert_eq!(err.message, "Account is pending verification");
    }

    #[test]
    fn test_owner_may_modify() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
            verified: true,
        };
        let enforcer = RbacEnforcer::new();
        assert!(enforcer
            .require_on(&actor, Some(actor.user_id), Capability::ModifyEntry)
            .is_ok());
        assert!(!enforcer.allows(&actor, Some(Uuid::new_v4()), Capability::ModifyEntry));
    }
}
