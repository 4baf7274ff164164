//! Invoice repository: CRUD operations for the `invoices` table.
//!
//! Amounts are stored as integer cents.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{like_pattern, page_offset, total_pages, Database, DatabaseError};

/// A raw invoice row from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRow {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: String,
    pub date: String,
}

impl InvoiceRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            customer_id: row.get("customer_id")?,
            amount: row.get("amount")?,
            status: row.get("status")?,
            date: row.get("date")?,
        })
    }
}

/// An invoice joined with its customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListItem {
    pub id: String,
    pub amount: i64,
    pub status: String,
    pub date: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl InvoiceListItem {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            amount: row.get("amount")?,
            status: row.get("status")?,
            date: row.get("date")?,
            name: row.get("name")?,
            email: row.get("email")?,
            image_url: row.get("image_url")?,
        })
    }
}

const SEARCH_CONDITION: &str = r"fold(customers.name) LIKE fold(?1) ESCAPE '\'
    OR fold(customers.email) LIKE fold(?1) ESCAPE '\'
    OR fold(invoices.amount) LIKE fold(?1) ESCAPE '\'
    OR fold(invoices.date) LIKE fold(?1) ESCAPE '\'
    OR fold(invoices.status) LIKE fold(?1) ESCAPE '\'";

const LIST_COLUMNS: &str = "invoices.id, invoices.amount, invoices.status, invoices.date,
    customers.name, customers.email, customers.image_url";

/// Inserts a new invoice row.
pub fn insert(db: &Database, invoice: &InvoiceRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO invoices (id, customer_id, amount, status, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                invoice.id,
                invoice.customer_id,
                invoice.amount,
                invoice.status,
                invoice.date
            ],
        )?;
        Ok(())
    })
}

/// Updates customer, amount and status. The date is kept.
pub fn update(
    db: &Database,
    id: &str,
    customer_id: &str,
    amount: i64,
    status: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE invoices SET customer_id = ?2, amount = ?3, status = ?4 WHERE id = ?1",
            params![id, customer_id, amount, status],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes an invoice row.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Finds an invoice by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<InvoiceRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM invoices WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], InvoiceRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// The `limit` most recent invoices.
pub fn latest(db: &Database, limit: u32) -> Result<Vec<InvoiceListItem>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {} FROM invoices
             JOIN customers ON invoices.customer_id = customers.id
             ORDER BY invoices.date DESC, invoices.rowid DESC
             LIMIT ?1",
            LIST_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![i64::from(limit)], InvoiceListItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// One page of invoices matching `query` on customer, amount, date or
/// status, newest first.
pub fn list_page(
    db: &Database,
    query: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<InvoiceListItem>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {} FROM invoices
             JOIN customers ON invoices.customer_id = customers.id
             WHERE {}
             ORDER BY invoices.date DESC, invoices.rowid DESC
             LIMIT ?2 OFFSET ?3",
            LIST_COLUMNS, SEARCH_CONDITION
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    like_pattern(query),
                    i64::from(page_size),
                    page_offset(page, page_size)
                ],
                InvoiceListItem::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Number of pages `list_page` can return for `query`.
pub fn count_pages(db: &Database, query: &str, page_size: u32) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT COUNT(*) FROM invoices
             JOIN customers ON invoices.customer_id = customers.id
             WHERE {}",
            SEARCH_CONDITION
        );
        let count: u64 = conn.query_row(&sql, params![like_pattern(query)], |r| r.get(0))?;
        Ok(total_pages(count, page_size))
    })
}
