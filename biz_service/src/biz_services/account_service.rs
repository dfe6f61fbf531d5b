use crate::entitys::account_entity::AccountInfo;
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::{GatewayError, OrderType, QueryBuilder};

pub struct AccountService {
    pub dao: BaseRepository<AccountInfo>,
}

impl AccountService {
    pub const TABLE: &'static str = "accounts";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    pub async fn list_active(&self) -> Result<Vec<AccountInfo>, GatewayError> {
        self.dao.query(QueryBuilder::new().eq("is_active", true).order_by("provider", OrderType::Asc)).await
    }
}
