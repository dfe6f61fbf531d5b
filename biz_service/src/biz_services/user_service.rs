use crate::entitys::role_entity::Role;
use crate::entitys::user_entity::UserInfo;
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::GatewayError;

pub struct UserService {
    pub dao: BaseRepository<UserInfo>,
}

impl UserService {
    pub const TABLE: &'static str = "users";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    /// Role from the user's profile row; `None` when there is no profile or
    /// the stored role is not one we know.
    pub async fn find_role(&self, user_id: &str) -> Result<Option<Role>, GatewayError> {
        let user = self.dao.find_by_id(user_id).await?;
        Ok(user.and_then(|u| Role::parse(&u.role)))
    }
}
