//! Dashboard summary queries: aggregate counts for the overview cards.

use serde::Serialize;

use super::{customer_repo, document_repo, Database, DatabaseError};

/// Figures shown on the dashboard overview. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub number_of_customers: u64,
    pub number_of_documents: u64,
    pub number_of_invoices: u64,
    pub total_paid_invoices: i64,
    pub total_pending_invoices: i64,
}

/// Collects the overview figures.
pub fn card_data(db: &Database) -> Result<CardData, DatabaseError> {
    let number_of_customers = customer_repo::count_all(db)?;
    let number_of_documents = document_repo::count_all(db)?;

    let (number_of_invoices, total_paid_invoices, total_pending_invoices) =
        db.with_conn(|conn| {
            let totals: (u64, i64, i64) = conn.query_row(
                "SELECT COUNT(*),
                 COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)
                 FROM invoices",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
            Ok(totals)
        })?;

    Ok(CardData {
        number_of_customers,
        number_of_documents,
        number_of_invoices,
        total_paid_invoices,
        total_pending_invoices,
    })
}
