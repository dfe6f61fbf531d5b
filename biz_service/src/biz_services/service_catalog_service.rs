use crate::entitys::service_entity::ServiceInfo;
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::{GatewayError, OrderType, QueryBuilder};

/// Read-only access to the `services` catalog shown on the intake form.
pub struct ServiceCatalogService {
    pub dao: BaseRepository<ServiceInfo>,
}

impl ServiceCatalogService {
    pub const TABLE: &'static str = "services";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    pub async fn list_active(&self) -> Result<Vec<ServiceInfo>, GatewayError> {
        self.dao.query(QueryBuilder::new().eq("is_active", true).order_by("name", OrderType::Asc)).await
    }
}
