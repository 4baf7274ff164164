use tracing::info;

use super::{ActionError, Dashboard, Persistence};
use crate::db::customer_repo::{self, CustomerField, CustomerRow, CustomerSummary};
use crate::db::new_id;
use crate::forms::CustomerInput;

const ENTITY: &str = "Customer";

impl Dashboard {
    pub fn create_customer(
        &self,
        input: CustomerInput,
    ) -> Result<Persistence<CustomerRow>, ActionError> {
        let customer = input
            .validate()
            .map_err(|errors| ActionError::invalid(errors, "Create Customer"))?;

        let row = CustomerRow {
            id: new_id(),
            name: customer.name,
            email: customer.email,
            image_url: customer.image_url,
        };
        let persisted = self.persist("Create Customer", customer_repo::insert(&self.db, &row))?;
        if persisted.is_persisted() {
            info!(customer_id = %row.id, "Customer created");
        }
        Ok(persisted.map(|()| row))
    }

    pub fn update_customer(&self, id: &str, input: CustomerInput) -> Result<CustomerRow, ActionError> {
        let customer = input
            .validate()
            .map_err(|errors| ActionError::invalid(errors, "Update Customer"))?;

        let row = CustomerRow {
            id: id.to_string(),
            name: customer.name,
            email: customer.email,
            image_url: customer.image_url,
        };
        let changed = customer_repo::update(&self.db, &row)
            .map_err(ActionError::update_failed("Update Customer"))?;
        if !changed {
            return Err(ActionError::not_found(ENTITY, id));
        }
        Ok(row)
    }

    /// Fails while documents or invoices still reference the customer.
    pub fn delete_customer(&self, id: &str) -> Result<Persistence<()>, ActionError> {
        self.delete_with(ENTITY, "Delete Customer", id, customer_repo::delete)
    }

    pub fn customer(&self, id: &str) -> Result<CustomerRow, ActionError> {
        customer_repo::find_by_id(&self.db, id)
            .map_err(ActionError::database("Fetch Customer"))?
            .ok_or_else(|| ActionError::not_found(ENTITY, id))
    }

    /// Every customer as id and name, for pickers.
    pub fn customers(&self) -> Result<Vec<CustomerField>, ActionError> {
        customer_repo::list_all(&self.db).map_err(ActionError::database("Fetch All Customers"))
    }

    pub fn customers_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<CustomerSummary>, ActionError> {
        customer_repo::list_page(&self.db, query, page, self.page_size())
            .map_err(ActionError::database("Fetch Customer Table"))
    }

    pub fn customer_pages(&self, query: &str) -> Result<u64, ActionError> {
        customer_repo::count_pages(&self.db, query, self.page_size())
            .map_err(ActionError::database("Fetch Total Number of Customers"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::forms::InvoiceInput;

    fn input(name: &str, email: &str) -> CustomerInput {
        CustomerInput {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            image: Some("/customers/placeholder.png".to_string()),
        }
    }

    #[test]
    fn test_create_and_fetch_customer() {
        let (_dir, dashboard) = dashboard();
        let row = dashboard
            .create_customer(input("Michael Novotny", "michael@novotny.com"))
            .unwrap()
            .persisted()
            .unwrap();

        assert_eq!(dashboard.customer(&row.id).unwrap(), row);
        let all = dashboard.customers().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Michael Novotny");
    }

    #[test]
    fn test_create_invalid_customer() {
        let (_dir, dashboard) = dashboard();
        let err = dashboard.create_customer(input("", "nope")).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(dashboard.customers().unwrap().is_empty());
    }

    #[test]
    fn test_update_customer() {
        let (_dir, dashboard) = dashboard();
        let row = dashboard
            .create_customer(input("Balazs Orban", "balazs@orban.com"))
            .unwrap()
            .persisted()
            .unwrap();

        let updated = dashboard
            .update_customer(&row.id, input("Balázs Orbán", "balazs@orban.com"))
            .unwrap();
        assert_eq!(dashboard.customer(&row.id).unwrap(), updated);

        let err = dashboard
            .update_customer("missing", input("A", "a@b.c"))
            .unwrap_err();
        assert!(matches!(err, ActionError::NotFound { .. }));
    }

    #[test]
    fn test_delete_referenced_customer_follows_policy() {
        for config in [crate::config::Config::default(), fail_open()] {
            let (_dir, dashboard) = dashboard_with(config);
            add_customer(&dashboard, "c1", "Jared Palmer");
            dashboard
                .create_invoice(InvoiceInput {
                    customer_id: Some("c1".to_string()),
                    amount: Some("10".to_string()),
                    status: Some("paid".to_string()),
                })
                .unwrap();

            match dashboard.delete_customer("c1") {
                Err(ActionError::Database { .. }) => {}
                Ok(Persistence::Suppressed { .. }) => {}
                other => panic!("unexpected result: {:?}", other),
            }
            assert!(dashboard.customer("c1").is_ok());
        }
    }

    #[test]
    fn test_delete_customer() {
        let (_dir, dashboard) = dashboard();
        add_customer(&dashboard, "c1", "Jared Palmer");
        assert!(dashboard.delete_customer("c1").unwrap().is_persisted());
        assert!(matches!(
            dashboard.delete_customer("c1"),
            Err(ActionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_customers_page() {
        let (_dir, dashboard) = dashboard();
        for i in 0..8 {
            add_customer(&dashboard, &format!("c{}", i), &format!("Customer {}", i));
        }
        assert_eq!(dashboard.customer_pages("").unwrap(), 2);
        assert_eq!(dashboard.customers_page("", 2).unwrap().len(), 2);
        assert_eq!(dashboard.customer_pages("customer 3").unwrap(), 1);
        assert_eq!(dashboard.customers_page("c3@", 1).unwrap()[0].id, "c3");
    }
}
