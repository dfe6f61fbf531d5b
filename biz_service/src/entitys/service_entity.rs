use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry (`services`), e.g. "ATS CV – 24h".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
