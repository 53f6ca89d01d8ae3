use serde::{Deserialize, Serialize};

/// Staff and guardian roles recognized at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Director,
    Teacher,
    Guardian,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Director => "director",
            Role::Teacher => "teacher",
            Role::Guardian => "guardian",
        }
    }
}

/// Requester as established by the session layer upstream. Token and
/// session validation are not this crate's concern; by the time an identity
/// arrives here it is authenticated, and only the capability check remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterIdentity {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role {actual:?} of user {user_id} is not permitted for this operation")]
pub struct AccessDenied {
    pub user_id: String,
    pub actual: Role,
}

/// Capability check applied once per service operation, replacing inline
/// permission blocks at every endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    pub fn require(
        &self,
        identity: &RequesterIdentity,
        required: &[Role],
    ) -> Result<(), AccessDenied> {
        if required.contains(&identity.role) {
            Ok(())
        } else {
            Err(AccessDenied {
                user_id: identity.user_id.clone(),
                actual: identity.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> RequesterIdentity {
        RequesterIdentity {
            user_id: "u-1".to_string(),
            role,
        }
    }

    #[test]
    fn role_in_the_required_set_is_allowed() {
        let guard = AccessGuard;
        assert!(guard
            .require(&identity(Role::Teacher), &[Role::Teacher, Role::Director])
            .is_ok());
    }

    #[test]
    fn role_outside_the_required_set_is_denied() {
        let guard = AccessGuard;
        let denied = guard
            .require(&identity(Role::Guardian), &[Role::Teacher, Role::Director])
            .expect_err("guardian should be denied");
        assert_eq!(denied.actual, Role::Guardian);
        assert_eq!(denied.user_id, "u-1");
    }
}
