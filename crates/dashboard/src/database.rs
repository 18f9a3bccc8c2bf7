//! Read-only queries backing the dashboard pages.
//!
//! None of these mutate state; they assume the tables were already seeded.

use crate::errors::AppError;
use crate::models::{CardData, LatestInvoice, LatestInvoiceRaw, Revenue};
use sqlx::PgPool;
use tracing::debug;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, AppError> {
        let revenue: Vec<Revenue> = sqlx::query_as(
            r#"
            SELECT month, revenue
            FROM revenue
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(revenue)
    }

    /// Returns the five most recent invoices with their customer details.
    pub async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>, AppError> {
        let rows: Vec<LatestInvoiceRaw> = sqlx::query_as(
            r#"
            SELECT invoices.id, customers.name, customers.email, customers.image_url,
                   invoices.amount
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                amount: format_currency(i64::from(row.amount)),
            })
            .collect())
    }

    /// Returns the summary card totals. The three queries run concurrently.
    pub async fn fetch_card_data(&self) -> Result<CardData, AppError> {
        let invoice_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool);
        let customer_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool);
        let status_totals = sqlx::query_as::<_, (Option<i64>, Option<i64>)>(
            r#"
            SELECT
                SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END),
                SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END)
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool);

        let (number_of_invoices, number_of_customers, (paid, pending)) =
            tokio::try_join!(invoice_count, customer_count, status_totals)?;

        debug!(number_of_invoices, number_of_customers, "Fetched card data");

        Ok(CardData {
            number_of_invoices,
            number_of_customers,
            total_paid_invoices: format_currency(paid.unwrap_or(0)),
            total_pending_invoices: format_currency(pending.unwrap_or(0)),
        })
    }
}

/// Formats an amount in cents as US dollars, e.g. `123456` → `"$1,234.56"`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_amounts() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(5), "$0.05");
        assert_eq!(format_currency(666), "$6.66");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_currency(15795), "$157.95");
        assert_eq!(format_currency(123456), "$1,234.56");
        assert_eq!(format_currency(100_000_000), "$1,000,000.00");
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(format_currency(-123456), "-$1,234.56");
    }
}
