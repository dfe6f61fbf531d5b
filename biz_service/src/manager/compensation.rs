//! Best-effort multi-resource "transaction" over a row store and a blob
//! store that share no transaction boundary.
//!
//! Every side effect is registered as an [`UndoAction`] in issue order.
//! `commit` forgets the list; `rollback` replays it in reverse, deleting rows
//! and removing blobs. Undo failures are logged and reported but never replace
//! the error that caused the rollback.

use common::storage::BlobGateway;
use common::{QueryBuilder, RowGateway};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// `DELETE FROM {table} WHERE {column} = {value}`
    DeleteRows { table: String, column: String, value: String },
    RemoveBlob { bucket: String, key: String },
}

impl fmt::Display for UndoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoAction::DeleteRows { table, column, value } => write!(f, "delete {table} where {column}={value}"),
            UndoAction::RemoveBlob { bucket, key } => write!(f, "remove blob {bucket}/{key}"),
        }
    }
}

/// Outcome of a rollback.
#[derive(Debug, Default)]
pub struct RollbackReport {
    pub attempted: usize,
    /// Undo actions that could not be applied, with the backend's error text.
    pub failed: Vec<(UndoAction, String)>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CompensatingTx {
    rows: Arc<dyn RowGateway>,
    blobs: Arc<dyn BlobGateway>,
    undo: Vec<UndoAction>,
    /// Log context, the client id once allocated.
    label: Option<String>,
}

impl CompensatingTx {
    pub fn begin(rows: Arc<dyn RowGateway>, blobs: Arc<dyn BlobGateway>) -> Self {
        Self { rows, blobs, undo: Vec::new(), label: None }
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn track_rows(&mut self, table: &str, column: &str, value: &str) {
        self.undo.push(UndoAction::DeleteRows {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        });
    }

    pub fn track_blob(&mut self, bucket: &str, key: &str) {
        self.undo.push(UndoAction::RemoveBlob { bucket: bucket.to_string(), key: key.to_string() });
    }

    pub fn pending(&self) -> &[UndoAction] {
        &self.undo
    }

    /// Keeps every tracked effect. Returns how many there were.
    pub fn commit(mut self) -> usize {
        let kept = std::mem::take(&mut self.undo).len();
        debug!("commit [{}]: {} effects kept", self.label.as_deref().unwrap_or("-"), kept);
        kept
    }

    /// Undoes tracked effects newest-first. Every action is attempted even
    /// when an earlier one fails.
    pub async fn rollback(mut self) -> RollbackReport {
        let actions = std::mem::take(&mut self.undo);
        let label = self.label.clone().unwrap_or_else(|| "-".to_string());
        let mut report = RollbackReport { attempted: actions.len(), failed: Vec::new() };
        for action in actions.into_iter().rev() {
            let outcome = match &action {
                UndoAction::DeleteRows { table, column, value } => {
                    self.rows.delete(table, &QueryBuilder::new().eq(column, value)).await.map(|n| n.to_string())
                }
                UndoAction::RemoveBlob { bucket, key } => self.blobs.remove(bucket, key).await.map(|_| "1".to_string()),
            };
            match outcome {
                Ok(affected) => debug!("rollback [{}]: {} ({} affected)", label, action, affected),
                Err(e) => {
                    warn!("rollback [{}]: {} failed, manual cleanup required: {}", label, action, e);
                    report.failed.push((action, e.to_string()));
                }
            }
        }
        info!("rollback [{}]: {} undo actions, {} failed", label, report.attempted, report.failed.len());
        report
    }
}

impl Drop for CompensatingTx {
    fn drop(&mut self) {
        if !self.undo.is_empty() {
            error!(
                "compensating tx [{}] dropped unfinished, effects left in place: {}",
                self.label.as_deref().unwrap_or("-"),
                self.undo.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
            );
        }
    }
}
