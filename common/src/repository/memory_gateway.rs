use crate::repository::gateway_error::GatewayError;
use crate::repository::query_builder::QueryBuilder;
use crate::repository::row_gateway::RowGateway;
use crate::util::common_utils::build_id;
use crate::util::date_util::now_rfc3339;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// In-process `RowGateway` for local runs and tests.
///
/// Rows are JSON objects; `id` and `created_at` are filled in on insert when
/// missing. Failures can be injected per table to exercise unwind paths.
#[derive(Default)]
pub struct MemoryRowGateway {
    tables: DashMap<String, Vec<Value>>,
    /// table -> inserts still allowed before every further insert fails
    failing_inserts: DashMap<String, usize>,
    failing_deletes: DashMap<String, ()>,
    /// inserts that land but whose reply is lost
    lost_replies: DashMap<String, ()>,
}

impl MemoryRowGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Snapshot of a table.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.get(table).map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Every insert into `table` fails from now on.
    pub fn fail_inserts_into(&self, table: &str) {
        self.fail_inserts_after(table, 0);
    }

    /// The next `allowed` inserts into `table` succeed, later ones fail.
    pub fn fail_inserts_after(&self, table: &str, allowed: usize) {
        self.failing_inserts.insert(table.to_string(), allowed);
    }

    /// Inserts into `table` are stored, then reported as timed out.
    pub fn lose_insert_replies_from(&self, table: &str) {
        self.lost_replies.insert(table.to_string(), ());
    }

    pub fn fail_deletes_from(&self, table: &str) {
        self.failing_deletes.insert(table.to_string(), ());
    }

    fn check_insert_allowed(&self, table: &str) -> Result<(), GatewayError> {
        if let Some(mut allowed) = self.failing_inserts.get_mut(table) {
            if *allowed == 0 {
                return Err(GatewayError::Rejected { status: 500, message: format!("insert into {table} failed") });
            }
            *allowed -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl RowGateway for MemoryRowGateway {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, GatewayError> {
        self.check_insert_allowed(table)?;
        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            let object = row
                .as_object_mut()
                .ok_or_else(|| GatewayError::InvalidRequest(format!("row for {table} is not an object")))?;
            if object.get("id").map_or(true, Value::is_null) {
                object.insert("id".to_string(), Value::String(build_id()));
            }
            object.entry("created_at").or_insert_with(|| Value::String(now_rfc3339()));
            stored.push(row);
        }
        self.tables.entry(table.to_string()).or_default().extend(stored.iter().cloned());
        if self.lost_replies.contains_key(table) {
            return Err(GatewayError::Timeout);
        }
        Ok(stored)
    }

    async fn select(&self, table: &str, query: &QueryBuilder) -> Result<Vec<Value>, GatewayError> {
        Ok(query.apply(self.rows(table)))
    }

    async fn delete(&self, table: &str, query: &QueryBuilder) -> Result<u64, GatewayError> {
        if !query.has_filters() {
            return Err(GatewayError::InvalidRequest(format!("unfiltered delete on {table}")));
        }
        if self.failing_deletes.contains_key(table) {
            return Err(GatewayError::Rejected { status: 500, message: format!("delete from {table} failed") });
        }
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !query.matches(row));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_ids_and_select_filters() {
        let gw = MemoryRowGateway::new();
        let stored = gw
            .insert("client_services", vec![json!({"client_id": "c-1", "service_id": "svc-1"}), json!({"client_id": "c-2", "service_id": "svc-1"})])
            .await
            .unwrap();
        assert!(stored.iter().all(|r| r["id"].is_string() && r["created_at"].is_string()));
        let rows = gw.select("client_services", &QueryBuilder::new().eq("client_id", "c-1")).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn injected_insert_failure_after_quota() {
        let gw = MemoryRowGateway::new();
        gw.fail_inserts_after("client_files", 1);
        assert!(gw.insert("client_files", vec![json!({"label": "a"})]).await.is_ok());
        assert!(gw.insert("client_files", vec![json!({"label": "b"})]).await.is_err());
        assert_eq!(gw.count("client_files"), 1);
    }

    #[tokio::test]
    async fn lost_reply_still_stores_the_row() {
        let gw = MemoryRowGateway::new();
        gw.lose_insert_replies_from("payments");
        let err = gw.insert("payments", vec![json!({"client_id": "c-1"})]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
        assert_eq!(gw.count("payments"), 1);
    }

    #[tokio::test]
    async fn delete_removes_only_matches() {
        let gw = MemoryRowGateway::new();
        gw.seed("clients", vec![json!({"id": "a"}), json!({"id": "b"})]);
        assert_eq!(gw.delete("clients", &QueryBuilder::new().eq("id", "a")).await.unwrap(), 1);
        assert_eq!(gw.rows("clients"), vec![json!({"id": "b"})]);
        assert!(gw.delete("clients", &QueryBuilder::new()).await.is_err());
        gw.fail_deletes_from("clients");
        assert!(gw.delete("clients", &QueryBuilder::new().eq("id", "b")).await.is_err());
    }
}
