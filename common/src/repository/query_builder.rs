use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum OrderType {
    #[default]
    Asc,
    Desc,
}

impl OrderType {
    fn as_str(&self) -> &'static str {
        match self {
            OrderType::Asc => "asc",
            OrderType::Desc => "desc",
        }
    }
}

/// Row filter understood by every `RowGateway`.
///
/// Only equality filters are supported; they are AND-ed together. The REST
/// gateway renders them as PostgREST query pairs (`column=eq.value`), the
/// memory gateway evaluates them with [`QueryBuilder::matches`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    filters: Vec<(String, String)>,
    order: Option<(String, OrderType)>,
    pub limit: Option<i64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        self.filters.push((field.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, field: &str, order: OrderType) -> Self {
        self.order = Some((field.to_string(), order));
        self
    }

    pub fn set_limit(mut self, val: i64) -> Self {
        self.limit = Some(val);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// PostgREST query string pairs, `select` excluded.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> =
            self.filters.iter().map(|(field, value)| (field.clone(), format!("eq.{}", value))).collect();
        if let Some((field, order)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", field, order.as_str())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(field, expected)| match row.get(field) {
            Some(actual) => value_as_filter_text(actual) == *expected,
            None => false,
        })
    }

    /// Filter, sort and truncate an in-memory table the way the REST API would.
    pub fn apply(&self, rows: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut selected: Vec<Value> = rows.into_iter().filter(|row| self.matches(row)).collect();
        if let Some((field, order)) = &self.order {
            selected.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                if *order == OrderType::Desc { ord.reverse() } else { ord }
            });
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit.max(0) as usize);
        }
        selected
    }
}

fn value_as_filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => value_as_filter_text(x).cmp(&value_as_filter_text(y)),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
