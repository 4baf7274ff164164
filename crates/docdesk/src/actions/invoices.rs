use tracing::info;

use super::{ActionError, Dashboard, Persistence, LATEST_INVOICES};
use crate::db::invoice_repo::{self, InvoiceListItem, InvoiceRow};
use crate::db::{new_id, today};
use crate::forms::InvoiceInput;

const ENTITY: &str = "Invoice";

impl Dashboard {
    /// Amounts arrive in dollars and are stored in cents.
    pub fn create_invoice(&self, input: InvoiceInput) -> Result<Persistence<InvoiceRow>, ActionError> {
        let invoice = input
            .validate()
            .map_err(|errors| ActionError::invalid(errors, "Create Invoice"))?;

        let row = InvoiceRow {
            id: new_id(),
            customer_id: invoice.customer_id,
            amount: invoice.amount_in_cents,
            status: invoice.status.as_str().to_string(),
            date: today(),
        };
        let persisted = self.persist("Create Invoice", invoice_repo::insert(&self.db, &row))?;
        if persisted.is_persisted() {
            info!(invoice_id = %row.id, amount = row.amount, "Invoice created");
        }
        Ok(persisted.map(|()| row))
    }

    pub fn update_invoice(&self, id: &str, input: InvoiceInput) -> Result<InvoiceRow, ActionError> {
        let invoice = input
            .validate()
            .map_err(|errors| ActionError::invalid(errors, "Update Invoice"))?;

        let changed = invoice_repo::update(
            &self.db,
            id,
            &invoice.customer_id,
            invoice.amount_in_cents,
            invoice.status.as_str(),
        )
        .map_err(ActionError::update_failed("Update Invoice"))?;
        if !changed {
            return Err(ActionError::not_found(ENTITY, id));
        }
        self.invoice(id)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<Persistence<()>, ActionError> {
        self.delete_with(ENTITY, "Delete Invoice", id, invoice_repo::delete)
    }

    pub fn invoice(&self, id: &str) -> Result<InvoiceRow, ActionError> {
        invoice_repo::find_by_id(&self.db, id)
            .map_err(ActionError::database("Fetch Invoice"))?
            .ok_or_else(|| ActionError::not_found(ENTITY, id))
    }

    pub fn latest_invoices(&self) -> Result<Vec<InvoiceListItem>, ActionError> {
        invoice_repo::latest(&self.db, LATEST_INVOICES)
            .map_err(ActionError::database("Fetch the Latest Invoices"))
    }

    pub fn invoices_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<InvoiceListItem>, ActionError> {
        invoice_repo::list_page(&self.db, query, page, self.page_size())
            .map_err(ActionError::database("Fetch Invoices"))
    }

    pub fn invoice_pages(&self, query: &str) -> Result<u64, ActionError> {
        invoice_repo::count_pages(&self.db, query, self.page_size())
            .map_err(ActionError::database("Fetch Total Number of Invoices"))
    }
}
