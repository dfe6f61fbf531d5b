use crate::repository::gateway_error::{check_response, GatewayError};
use crate::repository::query_builder::QueryBuilder;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;

/// Row operations over named tables of the hosted relational store.
#[async_trait]
pub trait RowGateway: Send + Sync {
    /// Inserts `rows` in one statement and returns them as stored (ids filled in).
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, GatewayError>;
    async fn select(&self, table: &str, query: &QueryBuilder) -> Result<Vec<Value>, GatewayError>;
    /// Deletes matching rows, returning how many went away. An unfiltered
    /// delete is refused.
    async fn delete(&self, table: &str, query: &QueryBuilder) -> Result<u64, GatewayError>;
}

/// PostgREST client (`{base_url}/rest/v1/{table}`), authenticated with the service-role key.
#[derive(Clone)]
pub struct RestRowGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestRowGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into(), api_key: api_key.into(), client })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl RowGateway for RestRowGateway {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, GatewayError> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&rows);
        let response = check_response(self.authorized(request).send().await?).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn select(&self, table: &str, query: &QueryBuilder) -> Result<Vec<Value>, GatewayError> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(query.to_query_pairs());
        let request = self.client.get(self.table_url(table)).query(&pairs);
        let response = check_response(self.authorized(request).send().await?).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn delete(&self, table: &str, query: &QueryBuilder) -> Result<u64, GatewayError> {
        if !query.has_filters() {
            return Err(GatewayError::InvalidRequest(format!("unfiltered delete on {table}")));
        }
        let request = self
            .client
            .delete(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&query.to_query_pairs());
        let response = check_response(self.authorized(request).send().await?).await?;
        let deleted = response.json::<Vec<Value>>().await?;
        Ok(deleted.len() as u64)
    }
}
