//! Generic access to collections of records.
//!
//! [`Collection`] describes how records of one entity are selected (table, joins, columns),
//! which public field names map to which columns and whether records are soft deleted.
//! Repositories use it for lookups by id, partial updates, soft deletes and paging, so that
//! these operations behave the same way for every entity:
//!
//! - missing records are reported as [`Error::RecordNotFound`] with entity name,
//! - soft deleted records are invisible unless a filter on the removal field is given explicitly,
//! - paging follows [`PageRequest`] rules.

use std::fmt::Display;

use garde::Validate;
use sqlx::{query_builder::Separated, FromRow, QueryBuilder};
use time::OffsetDateTime;
use tracing::debug;

use crate::{error::Result, ChosenDB, ChosenRow, Error, Filter, FilterOp, Order, Page, PageRequest};

/// Value to be written into a column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Timestamp(OffsetDateTime),
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Value::Timestamp(value)
    }
}

/// Partial update of a record, validated before it is applied
pub trait Changes: Validate<Context = ()> {
    /// Columns to set, fields not present in the update are not listed
    fn changes(&self) -> Vec<(&'static str, Value)>;
}

type Condition = (String, Option<String>);

#[derive(Debug, Clone, Copy)]
pub struct Collection {
    /// Entity name used in messages
    pub entity: &'static str,
    pub table: &'static str,
    pub alias: &'static str,
    /// Additional joins after the main table, can be empty
    pub joins: &'static str,
    /// Selected columns, qualified by aliases
    pub columns: &'static str,
    /// Public field name to qualified column, fields usable for sorting and filtering
    pub fields: &'static [(&'static str, &'static str)],
    /// Unqualified column holding removal timestamp
    pub soft_delete: Option<&'static str>,
}

impl Collection {
    fn column(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    fn soft_delete_column(&self) -> Option<String> {
        self.soft_delete
            .map(|column| format!("{}.{}", self.alias, column))
    }

    fn source(&self) -> String {
        format!("{} {} {}", self.table, self.alias, self.joins)
    }

    fn select(&self) -> QueryBuilder<'static, ChosenDB> {
        QueryBuilder::new(format!("SELECT {} FROM {}", self.columns, self.source()))
    }

    fn conditions(&self, filters: &[Filter]) -> Result<Vec<Condition>> {
        let soft_delete_column = self.soft_delete_column();
        let mut removal_requested = false;
        let mut conditions = Vec::with_capacity(filters.len() + 1);
        for filter in filters {
            let column = self
                .column(&filter.field)
                .ok_or_else(|| Error::InvalidFilter(filter.field.clone()))?;
            if soft_delete_column.as_deref() == Some(column) {
                removal_requested = true;
            }
            let condition = match (filter.op, &filter.value) {
                (FilterOp::Eq, None) => (format!("{column} IS NULL"), None),
                (FilterOp::Ne, None) => (format!("{column} IS NOT NULL"), None),
                (FilterOp::Eq, Some(value)) => (format!("{column} = "), Some(value.clone())),
                (FilterOp::Ne, Some(value)) => (format!("{column} != "), Some(value.clone())),
            };
            conditions.push(condition);
        }

        if let (Some(column), false) = (soft_delete_column, removal_requested) {
            conditions.push((format!("{column} IS NULL"), None));
        }
        Ok(conditions)
    }

    fn ordering(&self, order: Option<&Vec<Order>>) -> Result<Option<String>> {
        order
            .filter(|order| !order.is_empty())
            .map(|order| {
                order
                    .iter()
                    .map(|o| {
                        self.column(o.as_ref())
                            .map(|column| o.with_column(column))
                            .ok_or_else(|| Error::InvalidOrderByField(o.as_ref().to_string()))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(|o| o.join(", "))
            })
            .transpose()
    }

    async fn find_by_id<'c, E, T>(
        &self,
        executor: &E,
        id: i64,
        include_removed: bool,
    ) -> Result<Option<T>>
    where
        for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
        T: for<'r> FromRow<'r, ChosenRow> + Send + Unpin,
    {
        let mut query = self.select();
        query.push(format!(" WHERE {}.id = ", self.alias));
        query.push_bind(id);
        if let (Some(column), false) = (self.soft_delete_column(), include_removed) {
            query.push(format!(" AND {column} IS NULL"));
        }
        let record = query
            .build_query_as::<T>()
            .fetch_optional(executor)
            .await?;
        Ok(record)
    }

    /// Single record by id, soft deleted records are not found
    pub async fn get_by_id_or_fail<'c, E, T>(&self, executor: &E, id: i64) -> Result<T>
    where
        for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
        T: for<'r> FromRow<'r, ChosenRow> + Send + Unpin,
    {
        self.find_by_id(executor, id, false)
            .await?
            .ok_or_else(|| Error::not_found(self.entity))
    }

    /// Validates and applies changes, returns updated record
    pub async fn update_by_id_or_fail<'c, E, T, C>(
        &self,
        executor: &E,
        id: i64,
        changes: &C,
    ) -> Result<T>
    where
        for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
        T: for<'r> FromRow<'r, ChosenRow> + Send + Unpin,
        C: Changes,
    {
        changes.validate()?;
        let assignments = changes.changes();
        if assignments.is_empty() {
            return self.get_by_id_or_fail(executor, id).await;
        }

        let mut query = QueryBuilder::<ChosenDB>::new(format!("UPDATE {} SET ", self.table));
        let mut separated = query.separated(", ");
        for (column, value) in assignments {
            separated.push(format!("{column} = "));
            push_value(&mut separated, value);
        }
        query.push(" WHERE id = ");
        query.push_bind(id);
        if let Some(column) = self.soft_delete {
            query.push(format!(" AND {column} IS NULL"));
        }
        debug!("Update SQL: {}", query.sql());

        let result = query.build().execute(executor).await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(self.entity));
        }
        self.get_by_id_or_fail(executor, id).await
    }

    /// Marks record as removed, returns it with removal timestamp set
    pub async fn soft_delete_by_id_or_fail<'c, E, T>(&self, executor: &E, id: i64) -> Result<T>
    where
        for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
        T: for<'r> FromRow<'r, ChosenRow> + Send + Unpin,
    {
        let Some(column) = self.soft_delete else {
            return Err(Error::InvalidStoredData(format!(
                "{} cannot be soft deleted",
                self.entity
            )));
        };
        let sql = format!(
            "UPDATE {} SET {column} = ? WHERE id = ? AND {column} IS NULL",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(OffsetDateTime::now_utc())
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(self.entity));
        }
        self.find_by_id(executor, id, true)
            .await?
            .ok_or_else(|| Error::not_found(self.entity))
    }

    /// Counts matching records and fetches requested page of them.
    ///
    /// Count and fetch are separate reads, under concurrent writes `total` can be slightly off.
    pub async fn fetch_page<'c, E, T>(&self, executor: &E, request: &PageRequest) -> Result<Page<T>>
    where
        for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
        T: for<'r> FromRow<'r, ChosenRow> + Send + Unpin,
    {
        let conditions = self.conditions(&request.filter)?;
        let ordering = self.ordering(request.order.as_ref())?;

        let mut count_query =
            QueryBuilder::<ChosenDB>::new(format!("SELECT count(*) FROM {}", self.source()));
        push_where(&mut count_query, conditions.clone());
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(executor)
            .await?;
        let window = request.window(total)?;

        let mut query = self.select();
        push_where(&mut query, conditions);
        if let Some(ordering) = ordering {
            query.push(" ORDER BY ");
            query.push(ordering);
        }
        if let Some(limit) = window.limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
            query.push(" OFFSET ");
            query.push_bind(window.offset);
        }
        debug!("Page SQL: {}", query.sql());

        let rows = query.build_query_as::<T>().fetch_all(executor).await?;
        Ok(Page::new(window, rows))
    }
}

fn push_where(query: &mut QueryBuilder<'_, ChosenDB>, conditions: Vec<Condition>) {
    if conditions.is_empty() {
        return;
    }
    query.push(" WHERE ");
    let mut separated = query.separated(" AND ");
    for (sql, value) in conditions {
        separated.push(sql);
        if let Some(value) = value {
            separated.push_bind_unseparated(value);
        }
    }
}

fn push_value<Sep: Display>(separated: &mut Separated<'_, '_, ChosenDB, Sep>, value: Value) {
    match value {
        Value::Null => separated.push_unseparated("NULL"),
        Value::Text(s) => separated.push_bind_unseparated(s),
        Value::Integer(i) => separated.push_bind_unseparated(i),
        Value::Timestamp(t) => separated.push_bind_unseparated(t),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: Collection = Collection {
        entity: "Item",
        table: "item",
        alias: "i",
        joins: "",
        columns: "i.id, i.name",
        fields: &[("id", "i.id"), ("name", "i.name"), ("removeDate", "i.remove_date")],
        soft_delete: Some("remove_date"),
    };

    #[test]
    fn test_soft_delete_condition() {
        let conditions = ITEMS.conditions(&[]).unwrap();
        assert_eq!(conditions, vec![("i.remove_date IS NULL".to_string(), None)]);

        let conditions = ITEMS
            .conditions(&[Filter::is_not_null("removeDate")])
            .unwrap();
        assert_eq!(
            conditions,
            vec![("i.remove_date IS NOT NULL".to_string(), None)]
        );

        let conditions = ITEMS.conditions(&[Filter::eq("name", "x")]).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0], ("i.name = ".to_string(), Some("x".to_string())));
    }

    #[test]
    fn test_invalid_fields() {
        assert!(matches!(
            ITEMS.conditions(&[Filter::eq("secret", "x")]),
            Err(Error::InvalidFilter(_))
        ));
        assert!(matches!(
            ITEMS.ordering(Some(&vec![Order::Asc("secret".into())])),
            Err(Error::InvalidOrderByField(_))
        ));
    }

    #[test]
    fn test_ordering() {
        let order = vec![Order::Desc("name".into()), Order::Asc("id".into())];
        let ordering = ITEMS.ordering(Some(&order)).unwrap();
        assert_eq!(ordering.as_deref(), Some("i.name DESC, i.id"));
        assert_eq!(ITEMS.ordering(None).unwrap(), None);
    }
}
