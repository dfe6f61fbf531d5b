use crate::repository::gateway_error::GatewayError;
use crate::repository::query_builder::QueryBuilder;
use crate::repository::row_gateway::RowGateway;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[async_trait]
pub trait Repository<T> {
    async fn insert<E: Serialize + Sync>(&self, entity: &E) -> Result<T>;
    async fn insert_many<E: Serialize + Sync>(&self, entities: &[E]) -> Result<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn find_one(&self, query: QueryBuilder) -> Result<Option<T>>;
    async fn query(&self, query: QueryBuilder) -> Result<Vec<T>>;
}

/// Typed view over one table of a `RowGateway`.
pub struct BaseRepository<T: Send + Sync> {
    pub table: &'static str,
    pub gateway: Arc<dyn RowGateway>,
    _marker: PhantomData<T>,
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(gateway: Arc<dyn RowGateway>, table: &'static str) -> Self {
        Self { table, gateway, _marker: Default::default() }
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter().map(|row| serde_json::from_value(row).map_err(GatewayError::from)).collect()
}

#[async_trait]
impl<T> Repository<T> for BaseRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    async fn insert<E: Serialize + Sync>(&self, entity: &E) -> Result<T> {
        let row = serde_json::to_value(entity)?;
        let stored = self.gateway.insert(self.table, vec![row]).await?;
        let first = stored
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode(format!("insert into {} returned no rows", self.table)))?;
        Ok(serde_json::from_value(first)?)
    }

    async fn insert_many<E: Serialize + Sync>(&self, entities: &[E]) -> Result<Vec<T>> {
        if entities.is_empty() {
            return Ok(vec![]);
        }
        let rows = entities.iter().map(serde_json::to_value).collect::<std::result::Result<Vec<_>, _>>()?;
        let stored = self.gateway.insert(self.table, rows).await?;
        decode_rows(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(QueryBuilder::new().eq("id", id)).await
    }

    async fn find_one(&self, query: QueryBuilder) -> Result<Option<T>> {
        let rows = self.gateway.select(self.table, &query.set_limit(1)).await?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    async fn query(&self, query: QueryBuilder) -> Result<Vec<T>> {
        let rows = self.gateway.select(self.table, &query).await?;
        decode_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory_gateway::MemoryRowGateway;
    use serde::Deserialize;

    #[derive(Debug, Serialize)]
    struct NewNote<'a> {
        owner: &'a str,
        body: &'a str,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Note {
        id: String,
        owner: String,
        body: String,
    }

    #[tokio::test]
    async fn insert_then_find_round_trip() {
        let repo: BaseRepository<Note> = BaseRepository::new(Arc::new(MemoryRowGateway::new()), "notes");
        let stored = repo.insert(&NewNote { owner: "u-1", body: "hello" }).await.unwrap();
        let found = repo.find_by_id(&stored.id).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn insert_many_with_nothing_skips_the_gateway() {
        let gw = Arc::new(MemoryRowGateway::new());
        gw.fail_inserts_into("notes");
        let repo: BaseRepository<Note> = BaseRepository::new(gw, "notes");
        let stored = repo.insert_many::<NewNote>(&[]).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn undecodable_rows_surface_as_decode_errors() {
        let gw = Arc::new(MemoryRowGateway::new());
        gw.seed("notes", vec![serde_json::json!({"id": "n-1", "owner": 7})]);
        let repo: BaseRepository<Note> = BaseRepository::new(gw, "notes");
        assert!(matches!(repo.query(QueryBuilder::new()).await, Err(GatewayError::Decode(_))));
    }
}
