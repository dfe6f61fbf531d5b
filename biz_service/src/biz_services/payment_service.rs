use crate::entitys::payment_entity::{NewPayment, PaymentInfo};
use common::config::ServerRes;
use common::repository_util::{BaseRepository, Repository};
use common::GatewayError;

pub struct PaymentService {
    pub dao: BaseRepository<PaymentInfo>,
}

impl PaymentService {
    pub const TABLE: &'static str = "payments";

    pub fn new(db_res: ServerRes) -> Self {
        Self { dao: BaseRepository::new(db_res.rows, Self::TABLE) }
    }

    pub async fn record(&self, payment: &NewPayment) -> Result<PaymentInfo, GatewayError> {
        self.dao.insert(payment).await
    }
}
