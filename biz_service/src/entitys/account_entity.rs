use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Receiver account offered on the intake form (wallet / bank / InstaPay).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountInfo {
    pub id: String,
    pub provider: String,
    pub account_number: String,
    #[serde(default)]
    pub is_active: bool,
}
