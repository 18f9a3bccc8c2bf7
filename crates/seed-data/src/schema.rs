//! Idempotent table creation.

use std::fmt;

use sqlx::PgPool;
use tracing::debug;

use crate::SeedError;

const UUID_EXTENSION: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#;

/// The seeded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Customers,
    Invoices,
    Revenue,
}

impl Table {
    /// Seeding order. Customers precede invoices.
    pub const SEED_ORDER: [Table; 4] = [
        Table::Users,
        Table::Customers,
        Table::Invoices,
        Table::Revenue,
    ];

    /// Returns the database table name.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Customers => "customers",
            Table::Invoices => "invoices",
            Table::Revenue => "revenue",
        }
    }

    /// Returns the statements that create this table if it is absent.
    pub fn ddl(&self) -> &'static [&'static str] {
        match self {
            Table::Users => &[
                UUID_EXTENSION,
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL
                )
                "#,
            ],
            Table::Customers => &[
                UUID_EXTENSION,
                r#"
                CREATE TABLE IF NOT EXISTS customers (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    email VARCHAR(255) NOT NULL,
                    image_url VARCHAR(255) NOT NULL
                )
                "#,
            ],
            // No foreign key on customer_id.
            Table::Invoices => &[
                UUID_EXTENSION,
                r#"
                CREATE TABLE IF NOT EXISTS invoices (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    customer_id UUID NOT NULL,
                    amount INT NOT NULL,
                    status VARCHAR(255) NOT NULL,
                    date DATE NOT NULL
                )
                "#,
            ],
            Table::Revenue => &[r#"
                CREATE TABLE IF NOT EXISTS revenue (
                    month VARCHAR(4) NOT NULL UNIQUE,
                    revenue INT NOT NULL
                )
                "#],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates `table` (and the extension it needs) if it does not exist yet.
pub async fn ensure_table(pool: &PgPool, table: Table) -> Result<(), SeedError> {
    for statement in table.ddl() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|source| SeedError::Schema { table, source })?;
    }

    debug!(table = %table, "Ensured table exists");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_puts_customers_before_invoices() {
        let pos = |t: Table| Table::SEED_ORDER.iter().position(|x| *x == t).unwrap();
        assert_eq!(Table::SEED_ORDER[0], Table::Users);
        assert!(pos(Table::Customers) < pos(Table::Invoices));
        assert_eq!(Table::SEED_ORDER[3], Table::Revenue);
    }

    #[test]
    fn every_statement_is_idempotent() {
        for table in Table::SEED_ORDER {
            for statement in table.ddl() {
                assert!(
                    statement.contains("IF NOT EXISTS"),
                    "{table}: {statement}"
                );
            }
        }
    }

    #[test]
    fn uuid_tables_load_extension_first() {
        for table in [Table::Users, Table::Customers, Table::Invoices] {
            assert_eq!(table.ddl()[0], UUID_EXTENSION);
            assert!(table.ddl()[1].contains("uuid_generate_v4()"));
        }
        assert_eq!(Table::Revenue.ddl().len(), 1);
    }

    #[test]
    fn invoices_have_no_foreign_key() {
        let ddl = Table::Invoices.ddl().join("\n");
        assert!(!ddl.contains("REFERENCES"));
    }

    #[test]
    fn display_uses_table_name() {
        assert_eq!(Table::Revenue.to_string(), "revenue");
    }
}
