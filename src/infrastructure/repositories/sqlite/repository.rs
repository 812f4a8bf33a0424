// src/infrastructure/repositories/sqlite/repository.rs

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double, Text};
use diesel::sqlite::Sqlite;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use super::model::{DocumentRow, NewDocument};
use super::schema::documents::dsl;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::document_store::{
    ensure_updatable, fold_case, primary_key_of, Collection, Condition, DocumentStore, Filter,
    FindOptions, OnConflict, SortDirection,
};

/// Parameter bound into a raw statement.
#[derive(Debug, Clone, PartialEq)]
enum SqlParam {
    Text(String),
    Int(i64),
    Real(f64),
}

impl SqlParam {
    /// Convert a JSON scalar to the SQL value `json_extract` yields for it.
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => SqlParam::Int(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlParam::Int(i),
                None => SqlParam::Real(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => SqlParam::Text(s.clone()),
            other => SqlParam::Text(other.to_string()),
        }
    }
}

/// WHERE clause plus its parameters, in bind order.
#[derive(Debug, Default)]
struct SqlFragment {
    sql: String,
    params: Vec<SqlParam>,
}

fn field_expr(field: &str) -> SqliteResult<String> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(SqliteRepositoryError::InvalidField(field.to_string()));
    }
    Ok(format!("json_extract(body, '$.{}')", field))
}

fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn where_clause(collection: Collection, filter: &Filter) -> SqliteResult<SqlFragment> {
    let mut fragment = SqlFragment {
        sql: "collection = ?".to_string(),
        params: vec![SqlParam::Text(collection.name().to_string())],
    };

    for condition in filter.conditions() {
        let expr = field_expr(condition.field())?;
        let clause = match condition {
            Condition::Eq(_, Value::Null) => format!("{} IS NULL", expr),
            Condition::Eq(_, value) => {
                fragment.params.push(SqlParam::from_json(value));
                format!("{} = ?", expr)
            }
            Condition::EqIgnoreCase(_, value) => {
                fragment.params.push(SqlParam::Text(fold_case(value)));
                format!("lower({}) = ?", expr)
            }
            Condition::StartsWithIgnoreCase(_, prefix) => {
                fragment
                    .params
                    .push(SqlParam::Text(escape_like(&fold_case(prefix))));
                format!("lower({}) LIKE ? ESCAPE '\\'", expr)
            }
            Condition::In(_, values) if values.is_empty() => "0".to_string(),
            Condition::In(_, values) => {
                fragment.params.extend(values.iter().map(SqlParam::from_json));
                format!("{} IN ({})", expr, placeholders(values.len()))
            }
            Condition::NotIn(_, values) if values.is_empty() => "1".to_string(),
            Condition::NotIn(_, values) => {
                fragment.params.extend(values.iter().map(SqlParam::from_json));
                format!(
                    "({0} IS NULL OR {0} NOT IN ({1}))",
                    expr,
                    placeholders(values.len())
                )
            }
        };
        fragment.sql.push_str(" AND ");
        fragment.sql.push_str(&clause);
    }
    Ok(fragment)
}

fn select_statement(
    collection: Collection,
    filter: &Filter,
    options: &FindOptions,
) -> SqliteResult<SqlFragment> {
    let mut fragment = where_clause(collection, filter)?;
    fragment.sql = format!("SELECT doc_key, body FROM documents WHERE {}", fragment.sql);

    match options.order_by {
        Some((field, direction)) => {
            let direction = match direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            fragment.sql.push_str(&format!(
                " ORDER BY {} {}, doc_key ASC",
                field_expr(field)?,
                direction
            ));
        }
        None => fragment.sql.push_str(" ORDER BY doc_key ASC"),
    }

    match (options.limit, options.skip) {
        (None, None) => {}
        (limit, skip) => {
            fragment.sql.push_str(" LIMIT ? OFFSET ?");
            let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
            let skip = skip.map_or(0, |s| i64::try_from(s).unwrap_or(i64::MAX));
            fragment.params.push(SqlParam::Int(limit));
            fragment.params.push(SqlParam::Int(skip));
        }
    }
    Ok(fragment)
}

fn bind_all(fragment: SqlFragment) -> BoxedSqlQuery<'static, Sqlite, SqlQuery> {
    let mut query = sql_query(fragment.sql).into_boxed::<Sqlite>();
    for param in fragment.params {
        query = match param {
            SqlParam::Text(s) => query.bind::<Text, _>(s),
            SqlParam::Int(i) => query.bind::<BigInt, _>(i),
            SqlParam::Real(f) => query.bind::<Double, _>(f),
        };
    }
    query
}

fn parse_rows(rows: Vec<DocumentRow>) -> SqliteResult<Vec<Value>> {
    rows.into_iter()
        .map(|row| serde_json::from_str(&row.body).map_err(SqliteRepositoryError::from))
        .collect()
}

/// Document store persisting every collection in one sqlite table of JSON bodies.
#[derive(Clone, Debug)]
pub struct SqliteDocumentStore {
    pool: ConnectionPool,
}

impl SqliteDocumentStore {
    /// Create a new store with the provided database URL, running pending migrations
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Run `work` with a pooled connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, work: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PooledConnection) -> SqliteResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            work(&mut conn)
        })
        .await
        .map_err(|e| SqliteRepositoryError::TaskFailed(e.to_string()))?;
        result.map_err(DomainError::from)
    }
}

fn load(
    conn: &mut PooledConnection,
    collection: Collection,
    filter: &Filter,
    options: &FindOptions,
) -> SqliteResult<Vec<Value>> {
    let statement = select_statement(collection, filter, options)?;
    trace!("{}", statement.sql);
    let rows: Vec<DocumentRow> = bind_all(statement).load(conn)?;
    parse_rows(rows)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn find_object(&self, collection: Collection, filter: &Filter) -> DomainResult<Option<Value>> {
        let filter = filter.clone();
        let options = FindOptions::default().paged(None, Some(1));
        self.with_connection(move |conn| {
            Ok(load(conn, collection, &filter, &options)?.into_iter().next())
        })
        .await
    }

    async fn find_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> DomainResult<Vec<Value>> {
        let filter = filter.clone();
        let options = options.clone();
        self.with_connection(move |conn| load(conn, collection, &filter, &options))
            .await
    }

    #[instrument(skip(self, document), level = "trace")]
    async fn create_object(
        &self,
        collection: Collection,
        document: Value,
        on_conflict: OnConflict,
    ) -> DomainResult<bool> {
        if !document.is_object() {
            return Err(DomainError::Storage(format!(
                "{} documents must be JSON objects",
                collection
            )));
        }
        let key = primary_key_of(collection, &document)?;
        let body = serde_json::to_string(&document)?;

        self.with_connection(move |conn| {
            let row = NewDocument {
                collection: collection.name(),
                doc_key: &key,
                body: &body,
            };
            let written = match on_conflict {
                OnConflict::Fail => diesel::insert_into(dsl::documents)
                    .values(&row)
                    .execute(conn)?,
                OnConflict::Ignore => diesel::insert_or_ignore_into(dsl::documents)
                    .values(&row)
                    .execute(conn)?,
                OnConflict::Replace => diesel::replace_into(dsl::documents)
                    .values(&row)
                    .execute(conn)?,
            };
            if written == 0 {
                trace!("Ignoring duplicate {} {}", collection, key);
            }
            Ok(written > 0)
        })
        .await
    }

    #[instrument(skip(self, filter, updates), level = "trace")]
    async fn update_objects(
        &self,
        collection: Collection,
        filter: &Filter,
        updates: Map<String, Value>,
    ) -> DomainResult<usize> {
        ensure_updatable(collection, &updates)?;
        let filter = filter.clone();

        self.with_connection(move |conn| {
            conn.immediate_transaction::<_, SqliteRepositoryError, _>(|conn| {
                let statement = select_statement(collection, &filter, &FindOptions::default())?;
                let rows: Vec<DocumentRow> = bind_all(statement).load(conn)?;

                let mut affected = 0;
                for row in rows {
                    let mut document: Value = serde_json::from_str(&row.body)?;
                    let Some(fields) = document.as_object_mut() else {
                        continue;
                    };
                    for (field, value) in &updates {
                        fields.insert(field.clone(), value.clone());
                    }
                    let body = serde_json::to_string(&document)?;
                    affected += diesel::update(
                        dsl::documents
                            .filter(dsl::collection.eq(collection.name()))
                            .filter(dsl::doc_key.eq(&row.doc_key)),
                    )
                    .set(dsl::body.eq(body))
                    .execute(conn)?;
                }
                debug!("Updated {} {} document(s)", affected, collection);
                Ok(affected)
            })
        })
        .await
    }

    #[instrument(skip(self, filter), level = "trace")]
    async fn delete_objects(&self, collection: Collection, filter: &Filter) -> DomainResult<usize> {
        let filter = filter.clone();
        self.with_connection(move |conn| {
            let mut statement = where_clause(collection, &filter)?;
            statement.sql = format!("DELETE FROM documents WHERE {}", statement.sql);
            Ok(bind_all(statement).execute(conn)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_conditions_when_where_clause_then_params_follow_placeholders() {
        let filter = Filter::new()
            .eq("listId", 7)
            .eq_ignore_case("name", "Research")
            .is_in("url", ["a.com", "b.com"]);
        let fragment = where_clause(Collection::CustomLists, &filter).unwrap();

        assert_eq!(fragment.sql.matches('?').count(), fragment.params.len());
        assert_eq!(fragment.params[0], SqlParam::Text("customLists".to_string()));
        assert_eq!(fragment.params[1], SqlParam::Int(7));
        assert_eq!(fragment.params[2], SqlParam::Text("research".to_string()));
        assert!(fragment.sql.contains("json_extract(body, '$.url') IN (?, ?)"));
    }

    #[test]
    fn given_prefix_with_wildcards_when_escaped_then_matched_literally() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off%");
    }

    #[test]
    fn given_hostile_field_name_when_field_expr_then_rejected() {
        assert!(field_expr("name') OR 1=1 --").is_err());
        assert!(field_expr("createdAt").is_ok());
    }

    #[test]
    fn given_skip_without_limit_when_select_then_unbounded_limit() {
        let options = FindOptions::default().paged(Some(3), None);
        let fragment = select_statement(Collection::Pages, &Filter::new(), &options).unwrap();
        assert!(fragment.sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(
            &fragment.params[fragment.params.len() - 2..],
            &[SqlParam::Int(-1), SqlParam::Int(3)]
        );
    }
}
