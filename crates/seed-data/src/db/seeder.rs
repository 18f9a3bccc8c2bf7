//! Database seeding utilities.

use std::future::Future;

use sqlx::PgPool;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::fixtures::{Dataset, SeedUser};
use crate::schema::{self, Table};
use dashboard::auth;
use dashboard::errors::AppError;
use dashboard::models::{Customer, Invoice, Revenue};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to create table {table}: {source}")]
    Schema {
        table: Table,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to insert into {table}: {source}")]
    Insert {
        table: Table,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to hash password for user {user_id}: {source}")]
    Hash {
        user_id: Uuid,
        #[source]
        source: AppError,
    },
    #[error("Insert task for {table} did not complete: {source}")]
    Task {
        table: Table,
        #[source]
        source: JoinError,
    },
    #[error("Failed to release database connection: {0}")]
    Release(String),
}

/// Outcome of seeding one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    pub table: Table,
    /// Rows written by this run.
    pub inserted: usize,
    /// Rows whose key already existed.
    pub skipped: usize,
}

impl TableReport {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            inserted: 0,
            skipped: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}

/// Database seeder for inserting fixture data.
#[derive(Clone)]
pub struct Seeder {
    pool: PgPool,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates `table` if needed, then loads its fixture rows.
    ///
    /// Failures are logged with the table name before being returned.
    pub async fn seed_table(
        &self,
        table: Table,
        dataset: &Dataset,
    ) -> Result<TableReport, SeedError> {
        let result = async {
            schema::ensure_table(&self.pool, table).await?;
            match table {
                Table::Users => self.seed_users(&dataset.users).await,
                Table::Customers => self.seed_customers(&dataset.customers).await,
                Table::Invoices => self.seed_invoices(&dataset.invoices).await,
                Table::Revenue => self.seed_revenue(&dataset.revenue).await,
            }
        }
        .await;

        if let Err(e) = &result {
            error!(table = %table, "Error seeding {table}: {e}");
        }
        result
    }

    /// Seeds users, hashing each password before it is stored.
    ///
    /// A collision on either the id or the unique email counts as already
    /// seeded.
    pub async fn seed_users(&self, users: &[SeedUser]) -> Result<TableReport, SeedError> {
        info!("Seeding {} users...", users.len());
        let report = self.insert_all(Table::Users, users, insert_user).await?;
        info!(
            "Seeded users: {} inserted, {} skipped",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Seeds customers.
    pub async fn seed_customers(&self, customers: &[Customer]) -> Result<TableReport, SeedError> {
        info!("Seeding {} customers...", customers.len());
        let report = self
            .insert_all(Table::Customers, customers, insert_customer)
            .await?;
        info!(
            "Seeded customers: {} inserted, {} skipped",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Seeds invoices. `customer_id` is stored as given; it is not checked
    /// against the customers table.
    pub async fn seed_invoices(&self, invoices: &[Invoice]) -> Result<TableReport, SeedError> {
        info!("Seeding {} invoices...", invoices.len());
        let report = self
            .insert_all(Table::Invoices, invoices, insert_invoice)
            .await?;
        info!(
            "Seeded invoices: {} inserted, {} skipped",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Seeds monthly revenue.
    pub async fn seed_revenue(&self, revenue: &[Revenue]) -> Result<TableReport, SeedError> {
        info!("Seeding {} revenue months...", revenue.len());
        let report = self
            .insert_all(Table::Revenue, revenue, insert_revenue)
            .await?;
        info!(
            "Seeded revenue: {} inserted, {} skipped",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Spawns one insert per row and waits for all of them.
    ///
    /// Every task is drained even after a failure; the first failure observed
    /// is returned once the set is empty.
    async fn insert_all<T, F, Fut>(
        &self,
        table: Table,
        rows: &[T],
        insert: F,
    ) -> Result<TableReport, SeedError>
    where
        T: Clone + Send + 'static,
        F: Fn(PgPool, T) -> Fut,
        Fut: Future<Output = Result<u64, SeedError>> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        for row in rows.iter().cloned() {
            tasks.spawn(insert(self.pool.clone(), row));
        }

        let mut report = TableReport::new(table);
        let mut first_error = None;

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|source| SeedError::Task { table, source })
                .and_then(|inserted| inserted);

            match outcome {
                Ok(0) => {
                    debug!(table = %table, "Row already present, skipped");
                    report.skipped += 1;
                }
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    } else {
                        debug!(table = %table, "Additional insert failure: {e}");
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Counts the rows currently in `table`.
    pub async fn count_rows(&self, table: Table) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.name()))
            .fetch_one(&self.pool)
            .await
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn insert_user(pool: PgPool, user: SeedUser) -> Result<u64, SeedError> {
    let SeedUser {
        id,
        name,
        email,
        password,
    } = user;

    // Argon2 is CPU bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|source| SeedError::Task {
            table: Table::Users,
            source,
        })?
        .map_err(|source| SeedError::Hash { user_id: id, source })?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .execute(&pool)
    .await
    .map_err(|source| SeedError::Insert {
        table: Table::Users,
        source,
    })?;

    Ok(result.rows_affected())
}

async fn insert_customer(pool: PgPool, customer: Customer) -> Result<u64, SeedError> {
    let result = sqlx::query(
        r#"
        INSERT INTO customers (id, name, email, image_url)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(customer.id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.image_url)
    .execute(&pool)
    .await
    .map_err(|source| SeedError::Insert {
        table: Table::Customers,
        source,
    })?;

    Ok(result.rows_affected())
}

async fn insert_invoice(pool: PgPool, invoice: Invoice) -> Result<u64, SeedError> {
    let result = sqlx::query(
        r#"
        INSERT INTO invoices (id, customer_id, amount, status, date)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(invoice.id)
    .bind(invoice.customer_id)
    .bind(invoice.amount)
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .execute(&pool)
    .await
    .map_err(|source| SeedError::Insert {
        table: Table::Invoices,
        source,
    })?;

    Ok(result.rows_affected())
}

async fn insert_revenue(pool: PgPool, revenue: Revenue) -> Result<u64, SeedError> {
    let result = sqlx::query(
        r#"
        INSERT INTO revenue (month, revenue)
        VALUES ($1, $2)
        ON CONFLICT (month) DO NOTHING
        "#,
    )
    .bind(&revenue.month)
    .bind(revenue.revenue)
    .execute(&pool)
    .await
    .map_err(|source| SeedError::Insert {
        table: Table::Revenue,
        source,
    })?;

    Ok(result.rows_affected())
}
