use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never the plaintext.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Invoice status, stored as a plain string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    /// Logically a customer id. Not enforced by the schema.
    pub customer_id: Uuid,
    /// Amount in cents.
    pub amount: i32,
    pub status: InvoiceStatus,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Revenue {
    /// Short month code, e.g. "Jan".
    pub month: String,
    pub revenue: i32,
}

/// Row shape of the latest-invoices query, before amount formatting.
#[derive(Debug, Clone, FromRow)]
pub struct LatestInvoiceRaw {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: i32,
}

/// An invoice as shown in the "latest invoices" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Pre-formatted currency string, e.g. "$157.95".
    pub amount: String,
}

/// Totals shown on the dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_status_db_strings() {
        assert_eq!(InvoiceStatus::Pending.as_str(), "pending");
        assert_eq!(InvoiceStatus::Paid.as_str(), "paid");
    }

    #[test]
    fn invoice_status_serializes_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }

    #[test]
    fn card_data_serializes_field_names() {
        let card = CardData {
            number_of_invoices: 13,
            number_of_customers: 6,
            total_paid_invoices: "$1,000.00".to_string(),
            total_pending_invoices: "$0.00".to_string(),
        };
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["number_of_invoices"], 13);
        assert_eq!(value["total_pending_invoices"], "$0.00");
    }
}
