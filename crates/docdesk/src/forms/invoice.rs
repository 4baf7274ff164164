use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{required_text, FieldErrors, FormData};

pub const CUSTOMER_ID: &str = "customerId";
pub const AMOUNT: &str = "amount";
pub const STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(format!("Unknown invoice status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceInput {
    pub customer_id: Option<String>,
    /// Dollars, as typed into the form.
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl InvoiceInput {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            customer_id: form.text(CUSTOMER_ID).map(str::to_string),
            amount: form.text(AMOUNT).map(str::to_string),
            status: form.text(STATUS).map(str::to_string),
        }
    }

    pub fn validate(self) -> Result<ValidInvoice, FieldErrors> {
        let mut errors = FieldErrors::new();

        let customer_id = required_text(self.customer_id.as_deref());
        if customer_id.is_none() {
            errors.add(CUSTOMER_ID, "Please select a customer.");
        }

        let amount_in_cents = self.amount.as_deref().and_then(dollars_to_cents);
        if amount_in_cents.is_none() {
            errors.add(AMOUNT, "Please enter an amount greater than $0.");
        }

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.trim().parse::<InvoiceStatus>().ok());
        if status.is_none() {
            errors.add(STATUS, "Please select an invoice status.");
        }

        match (customer_id, amount_in_cents, status) {
            (Some(customer_id), Some(amount_in_cents), Some(status)) => Ok(ValidInvoice {
                customer_id,
                amount_in_cents,
                status,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
}

/// Parses a positive dollar amount and rounds it to whole cents.
/// Amounts that round to zero cents are rejected.
fn dollars_to_cents(raw: &str) -> Option<i64> {
    let dollars: f64 = raw.trim().parse().ok()?;
    if !dollars.is_finite() || dollars <= 0.0 {
        return None;
    }
    let cents = (dollars * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}
