// src/infrastructure/repositories/sqlite/model.rs
use super::schema::documents;
use diesel::prelude::*;
use diesel::sql_types::Text;

#[derive(Insertable, Debug)]
#[diesel(table_name = documents)]
pub struct NewDocument<'a> {
    pub collection: &'a str,
    pub doc_key: &'a str,
    pub body: &'a str,
}

/// Row shape of raw `SELECT doc_key, body` queries.
#[derive(QueryableByName, Debug, Clone)]
pub struct DocumentRow {
    #[diesel(sql_type = Text)]
    pub doc_key: String,
    #[diesel(sql_type = Text)]
    pub body: String,
}
