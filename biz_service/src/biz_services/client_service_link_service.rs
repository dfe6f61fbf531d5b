use crate::entitys::client_service_entity::{ClientServiceLink, NewClientServiceLink};
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::GatewayError;

/// Writes `client_services`, the client ↔ requested-service join.
pub struct ClientServiceLinkService {
    pub dao: BaseRepository<ClientServiceLink>,
}

impl ClientServiceLinkService {
    pub const TABLE: &'static str = "client_services";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    /// One row per service id, sent as a single bulk insert.
    pub async fn link(&self, client_id: &str, service_ids: &[String]) -> Result<Vec<ClientServiceLink>, GatewayError> {
        let links: Vec<NewClientServiceLink> = service_ids
            .iter()
            .map(|service_id| NewClientServiceLink { client_id: client_id.to_string(), service_id: service_id.clone() })
            .collect();
        self.dao.insert_many(&links).await
    }
}
