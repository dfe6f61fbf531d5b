use crate::entitys::client_file_entity::{ClientFileInfo, NewClientFile};
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::GatewayError;

pub struct ClientFileService {
    pub dao: BaseRepository<ClientFileInfo>,
}

impl ClientFileService {
    pub const TABLE: &'static str = "client_files";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    pub async fn record(&self, file: &NewClientFile) -> Result<ClientFileInfo, GatewayError> {
        self.dao.insert(file).await
    }
}
