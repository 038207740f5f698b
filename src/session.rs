// The signed-in user, passed explicitly to anything that needs it.
use crate::error::AccessError;
use crate::model::{Role, UserProfile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: UserProfile) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        matches!(&self.user, Some(u) if u.role == Role::Admin)
    }

    pub fn require_user(&self) -> Result<&UserProfile, AccessError> {
        self.user.as_ref().ok_or(AccessError::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<&UserProfile, AccessError> {
        let user = self.require_user()?;
        if user.role == Role::Admin {
            Ok(user)
        } else {
            Err(AccessError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_checks() {
        let anon = Session::anonymous();
        assert_eq!(anon.require_user(), Err(AccessError::Unauthenticated));
        assert_eq!(anon.require_admin(), Err(AccessError::Unauthenticated));

        let member = Session::signed_in(UserProfile::new("u1", "Mira", Role::Member));
        assert!(member.require_user().is_ok());
        assert_eq!(member.require_admin(), Err(AccessError::PermissionDenied));

        let admin = Session::signed_in(UserProfile::new("a1", "Ada", Role::Admin));
        assert!(admin.is_admin());
        assert_eq!(admin.require_admin().map(|u| u.uid.as_str()), Ok("a1"));
    }
}
