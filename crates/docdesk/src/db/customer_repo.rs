//! Customer repository: CRUD operations for the `customers` table.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{like_pattern, page_offset, total_pages, Database, DatabaseError};

/// A raw customer row from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl CustomerRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            image_url: row.get("image_url")?,
        })
    }
}

/// Id and name only, for customer pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

/// A customer with invoice totals (amounts in cents).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
}

const SEARCH_CONDITION: &str = r"fold(customers.name) LIKE fold(?1) ESCAPE '\'
    OR fold(customers.email) LIKE fold(?1) ESCAPE '\'";

/// Inserts a new customer row.
pub fn insert(db: &Database, customer: &CustomerRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO customers (id, name, email, image_url) VALUES (?1, ?2, ?3, ?4)",
            params![
                customer.id,
                customer.name,
                customer.email,
                customer.image_url
            ],
        )?;
        Ok(())
    })
}

/// Updates name, email and image of an existing customer. Returns `false`
/// when no row has the given id.
pub fn update(db: &Database, customer: &CustomerRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE customers SET name = ?2, email = ?3, image_url = ?4 WHERE id = ?1",
            params![
                customer.id,
                customer.name,
                customer.email,
                customer.image_url
            ],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes a customer. Fails while invoices or documents still reference it.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Finds a customer by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<CustomerRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM customers WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], CustomerRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All customers ordered by name.
pub fn list_all(db: &Database) -> Result<Vec<CustomerField>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM customers ORDER BY name ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CustomerField {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// One page of customers whose name or email contains `query`, with
/// invoice totals, ordered by name.
pub fn list_page(
    db: &Database,
    query: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<CustomerSummary>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT customers.id, customers.name, customers.email, customers.image_url,
             COUNT(invoices.id) AS total_invoices,
             COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0) AS total_pending,
             COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0) AS total_paid
             FROM customers
             LEFT JOIN invoices ON customers.id = invoices.customer_id
             WHERE {}
             GROUP BY customers.id, customers.name, customers.email, customers.image_url
             ORDER BY customers.name ASC
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
                |row| {
                    Ok(CustomerSummary {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        email: row.get("email")?,
                        image_url: row.get("image_url")?,
                        total_invoices: row.get("total_invoices")?,
                        total_pending: row.get("total_pending")?,
                        total_paid: row.get("total_paid")?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Number of pages `list_page` can return for `query`.
pub fn count_pages(db: &Database, query: &str, page_size: u32) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT COUNT(*) FROM customers WHERE {}", SEARCH_CONDITION);
        let count: u64 = conn.query_row(&sql, params![like_pattern(query)], |r| r.get(0))?;
        Ok(total_pages(count, page_size))
    })
}

/// Total number of customers.
pub fn count_all(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM customers", [], |r| r.get(0))?;
        Ok(count)
    })
}
