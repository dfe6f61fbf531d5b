use crate::entitys::client_entity::{ClientInfo, NewClient};
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::GatewayError;

pub struct ClientService {
    pub dao: BaseRepository<ClientInfo>,
}

impl ClientService {
    pub const TABLE: &'static str = "clients";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    /// Inserts the client and returns the stored row, id included.
    pub async fn create(&self, client: &NewClient) -> Result<ClientInfo, GatewayError> {
        self.dao.insert(client).await
    }
}
