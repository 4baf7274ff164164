//! Document repository: CRUD and lookup operations for the `documents` table.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{like_pattern, page_offset, total_pages, Database, DatabaseError};

/// A raw document row from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: String,
    pub customer_id: String,
    pub document_type: String,
    pub document_name: String,
    pub document_description: String,
    pub document_path: String,
    pub document_file_check_sum: String,
    pub date: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            customer_id: row.get("customer_id")?,
            document_type: row.get("document_type")?,
            document_name: row.get("document_name")?,
            document_description: row.get("document_description")?,
            document_path: row.get("document_path")?,
            document_file_check_sum: row.get("document_file_check_sum")?,
            date: row.get("date")?,
        })
    }
}

/// The user-editable part of a document. File, checksum and date are fixed
/// at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub customer_id: String,
    pub document_type: String,
    pub document_description: String,
}

/// A document joined with its customer, as shown in the documents table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListItem {
    pub id: String,
    pub document_type: String,
    pub document_name: String,
    pub document_description: String,
    pub document_path: String,
    pub date: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl DocumentListItem {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            document_type: row.get("document_type")?,
            document_name: row.get("document_name")?,
            document_description: row.get("document_description")?,
            document_path: row.get("document_path")?,
            date: row.get("date")?,
            name: row.get("name")?,
            email: row.get("email")?,
            image_url: row.get("image_url")?,
        })
    }
}

const SEARCH_CONDITION: &str = r"fold(customers.name) LIKE fold(?1) ESCAPE '\'
    OR fold(customers.email) LIKE fold(?1) ESCAPE '\'
    OR fold(documents.date) LIKE fold(?1) ESCAPE '\'";

/// Inserts a new document row.
pub fn insert(db: &Database, doc: &DocumentRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO documents (id, customer_id, document_type, document_name,
             document_description, document_path, document_file_check_sum, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                doc.id,
                doc.customer_id,
                doc.document_type,
                doc.document_name,
                doc.document_description,
                doc.document_path,
                doc.document_file_check_sum,
                doc.date,
            ],
        )?;
        Ok(())
    })
}

/// Overwrites the editable metadata of a document. Returns `false` when no
/// row has the given id.
pub fn update_metadata(
    db: &Database,
    id: &str,
    metadata: &DocumentMetadata,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE documents SET customer_id = ?2, document_type = ?3, document_description = ?4
             WHERE id = ?1",
            params![
                id,
                metadata.customer_id,
                metadata.document_type,
                metadata.document_description,
            ],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes a document row. The stored file is not touched.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Finds a document by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<DocumentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM documents WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], DocumentRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Counts rows whose id and stored checksum both match exactly.
pub fn count_matching(db: &Database, id: &str, checksum: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE id = ?1 AND document_file_check_sum = ?2",
            params![id, checksum],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// One page of documents whose customer name, customer email or date
/// contains `query`, newest first.
pub fn list_page(
    db: &Database,
    query: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<DocumentListItem>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT documents.id, documents.document_type, documents.document_name,
             documents.document_description, documents.document_path, documents.date,
             customers.name, customers.email, customers.image_url
             FROM documents
             JOIN customers ON documents.customer_id = customers.id
             WHERE {}
             ORDER BY documents.date DESC, documents.rowid DESC
             LIMIT ?2 OFFSET ?3",
            SEARCH_CONDITION
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    like_pattern(query),
                    i64::from(page_size),
                    page_offset(page, page_size)
                ],
                DocumentListItem::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Number of pages `list_page` can return for `query`.
pub fn count_pages(db: &Database, query: &str, page_size: u32) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT COUNT(*) FROM documents
             JOIN customers ON documents.customer_id = customers.id
             WHERE {}",
            SEARCH_CONDITION
        );
        let count: u64 = conn.query_row(&sql, params![like_pattern(query)], |r| r.get(0))?;
        Ok(total_pages(count, page_size))
    })
}

/// Total number of documents.
pub fn count_all(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
        Ok(count)
    })
}
