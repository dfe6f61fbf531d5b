use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard account profile (`users` table); the id matches the auth provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    /// `admin` | `moderator` | `designer`
    pub role: String,
    pub full_name: Option<String>,
}
