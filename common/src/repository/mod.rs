pub mod gateway_error;
pub mod memory_gateway;
pub mod query_builder;
pub mod repository_util;
pub mod row_gateway;

pub use gateway_error::GatewayError;
pub use memory_gateway::MemoryRowGateway;
pub use query_builder::{OrderType, QueryBuilder};
pub use repository_util::{BaseRepository, Repository};
pub use row_gateway::{RestRowGateway, RowGateway};
