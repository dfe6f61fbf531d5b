use serde::{Deserialize, Serialize};

/// Join row between a client and a requested service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewClientServiceLink {
    pub client_id: String,
    pub service_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientServiceLink {
    pub id: String,
    pub client_id: String,
    pub service_id: String,
}
