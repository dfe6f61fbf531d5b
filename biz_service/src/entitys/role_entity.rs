use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Dashboard role stored in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumString, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    Designer,
}

impl Role {
    /// Roles allowed to create client records.
    pub const CLIENT_WRITERS: [Role; 2] = [Role::Moderator, Role::Admin];

    /// Parses a stored role; anything unknown yields `None`.
    pub fn parse(value: &str) -> Option<Role> {
        value.trim().parse().ok()
    }
}

/// Where a signed-in user lands after login.
pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Moderator => "/clients/new",
        Role::Designer => "/tasks",
        Role::Admin => "/admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_has_its_own_landing_page() {
        assert_eq!(landing_route(Role::Moderator), "/clients/new");
        assert_eq!(landing_route(Role::Designer), "/tasks");
        assert_eq!(landing_route(Role::Admin), "/admin");
    }

    #[test]
    fn parses_stored_strings() {
        assert_eq!(Role::parse("moderator"), Some(Role::Moderator));
        assert_eq!(Role::parse(" admin "), Some(Role::Admin));
        assert_eq!(Role::parse("owner"), None);
        assert_eq!(Role::Designer.to_string(), "designer");
        assert_eq!(Role::Admin.as_ref(), "admin");
    }
}
