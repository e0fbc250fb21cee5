use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse authorization tag carried in tokens and stored as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    SuperAdmin,
    Moderator,
    Support,
    Manager,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::User,
        UserRole::Admin,
        UserRole::SuperAdmin,
        UserRole::Moderator,
        UserRole::Support,
        UserRole::Manager,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Admin => "admin",
            SuperAdmin => "superadmin",
            Moderator => "moderator",
            Support => "support",
            Manager => "manager",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Roles allowed into the admin panel
    #[inline]
    pub const fn is_admin_panel_role(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | SuperAdmin | Moderator | Support | Manager)
    }

    /// Roles a superadmin may hand out through `create-admin`
    #[inline]
    pub const fn is_assignable_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
        assert_eq!(UserRole::from_code("super_admin"), None);
        assert_eq!(UserRole::from_code("Admin"), None);
        assert_eq!(UserRole::from_code(""), None);
    }

    #[test]
    fn test_user_role_serde_matches_code() {
        for role in UserRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.code()));
        }
    }

    #[test]
    fn test_user_role_checks() {
        assert!(!UserRole::User.is_admin_panel_role());
        assert!(UserRole::Support.is_admin_panel_role());
        assert!(UserRole::Admin.is_assignable_admin());
        assert!(UserRole::SuperAdmin.is_assignable_admin());
        assert!(!UserRole::Manager.is_assignable_admin());
    }
}
