use serde::{Deserialize, Serialize};

/// Staff role hierarchy. Discriminants double as the stored integer value
/// and as the rank used for minimum-role comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff = 0,
    Manager = 1,
    Admin = 2,
}

impl Role {
    pub const VALUES: &'static [&'static str] = &["staff", "manager", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "staff" => Some(Role::Staff),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Rank in the total order: staff < manager < admin.
    pub fn rank(&self) -> i32 {
        *self as i32
    }

    /// Minimum-role comparison: a role at or above the required rank is
    /// authorized.
    pub fn satisfies_minimum(&self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }

    fn humanized(&self) -> &'static str {
        match self {
            Role::Staff => "Staff",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.humanized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_totally_ordered() {
        assert!(Role::Staff < Role::Manager);
        assert!(Role::Manager < Role::Admin);
    }

    // Pins the comparison direction: rank at or above the minimum permits.
    #[test]
    fn minimum_role_admits_at_or_above() {
        assert!(Role::Manager.satisfies_minimum(Role::Manager));
        assert!(Role::Admin.satisfies_minimum(Role::Manager));
        assert!(!Role::Staff.satisfies_minimum(Role::Manager));
    }

    #[test]
    fn equal_rank_is_permitted() {
        assert!(Role::Staff.satisfies_minimum(Role::Staff));
        assert!(Role::Admin.satisfies_minimum(Role::Admin));
    }

    #[test]
    fn parses_stored_strings() {
        assert_eq!(Role::parse("staff"), Some(Role::Staff));
        assert_eq!(Role::parse("manager"), Some(Role::Manager));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
    }
}
