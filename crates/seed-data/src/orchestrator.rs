//! Sequencing of a full seed run.
//!
//! A run moves through
//! `Idle → Connecting → Seeding(Users) → Seeding(Customers) → Seeding(Invoices)
//! → Seeding(Revenue) → Closing → Done`. A failed phase skips the remaining
//! phases and goes `Closing → Failed`. The target is released exactly once on
//! every path that acquired it.

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::db::{SeedError, Seeder, TableReport};
use crate::fixtures::Dataset;
use crate::schema::Table;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Connecting,
    Seeding(Table),
    Closing,
    Done,
    Failed,
}

/// Something the orchestrator can seed table by table and then release.
pub trait SeedTarget {
    fn seed_table(
        &self,
        table: Table,
        dataset: &Dataset,
    ) -> impl Future<Output = Result<TableReport, SeedError>> + Send;

    /// Releases the underlying connection. Called exactly once per run.
    fn release(self) -> impl Future<Output = Result<(), SeedError>> + Send;
}

impl SeedTarget for Seeder {
    async fn seed_table(&self, table: Table, dataset: &Dataset) -> Result<TableReport, SeedError> {
        Seeder::seed_table(self, table, dataset).await
    }

    async fn release(self) -> Result<(), SeedError> {
        self.close().await;
        Ok(())
    }
}

/// Per-table results of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn inserted(&self) -> usize {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }
}

/// Opens the connection pool described by `config`.
pub async fn connect(config: &SeedConfig) -> Result<Seeder, SeedError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .map_err(SeedError::Connect)?;

    info!("Connected to database");
    Ok(Seeder::new(pool))
}

/// Drives one seed run and records the states it passed through.
#[derive(Debug)]
pub struct Orchestrator {
    state: RunState,
    history: Vec<RunState>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            history: vec![RunState::Idle],
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Connects using `config` and seeds `dataset` into it.
    pub async fn seed(
        &mut self,
        config: &SeedConfig,
        dataset: &Dataset,
    ) -> Result<RunReport, SeedError> {
        self.run(connect(config), dataset).await
    }

    /// Acquires a target, seeds every table in [`Table::SEED_ORDER`], and
    /// releases the target whatever the outcome.
    pub async fn run<T, A>(&mut self, acquire: A, dataset: &Dataset) -> Result<RunReport, SeedError>
    where
        T: SeedTarget,
        A: Future<Output = Result<T, SeedError>>,
    {
        self.enter(RunState::Connecting);
        let target = match acquire.await {
            Ok(target) => target,
            Err(e) => {
                self.enter(RunState::Failed);
                return Err(e);
            }
        };

        let outcome = self.seed_all(&target, dataset).await;

        self.enter(RunState::Closing);
        let released = target.release().await;

        match (outcome, released) {
            (Ok(tables), Ok(())) => {
                self.enter(RunState::Done);
                Ok(RunReport { tables })
            }
            (Ok(_), Err(e)) => {
                self.enter(RunState::Failed);
                Err(e)
            }
            (Err(e), released) => {
                if let Err(release_err) = released {
                    warn!("Release also failed after seeding error: {release_err}");
                }
                self.enter(RunState::Failed);
                Err(e)
            }
        }
    }

    async fn seed_all<T: SeedTarget>(
        &mut self,
        target: &T,
        dataset: &Dataset,
    ) -> Result<Vec<TableReport>, SeedError> {
        let mut tables = Vec::with_capacity(Table::SEED_ORDER.len());
        for table in Table::SEED_ORDER {
            self.enter(RunState::Seeding(table));
            tables.push(target.seed_table(table, dataset).await?);
        }
        Ok(tables)
    }

    fn enter(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "Seed run state change");
        self.state = next;
        self.history.push(next);
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory target that records calls and can fail on one table.
    struct RecordingTarget {
        seeded: Arc<Mutex<Vec<Table>>>,
        releases: Arc<Mutex<usize>>,
        fail_on: Option<Table>,
        fail_release: bool,
    }

    impl RecordingTarget {
        fn new() -> (Self, Arc<Mutex<Vec<Table>>>, Arc<Mutex<usize>>) {
            let seeded = Arc::new(Mutex::new(Vec::new()));
            let releases = Arc::new(Mutex::new(0));
            let target = Self {
                seeded: seeded.clone(),
                releases: releases.clone(),
                fail_on: None,
                fail_release: false,
            };
            (target, seeded, releases)
        }
    }

    impl SeedTarget for RecordingTarget {
        async fn seed_table(
            &self,
            table: Table,
            dataset: &Dataset,
        ) -> Result<TableReport, SeedError> {
            self.seeded.lock().unwrap().push(table);
            if self.fail_on == Some(table) {
                return Err(SeedError::Insert {
                    table,
                    source: sqlx::Error::PoolTimedOut,
                });
            }
            let rows = match table {
                Table::Users => dataset.users.len(),
                Table::Customers => dataset.customers.len(),
                Table::Invoices => dataset.invoices.len(),
                Table::Revenue => dataset.revenue.len(),
            };
            Ok(TableReport {
                table,
                inserted: rows,
                skipped: 0,
            })
        }

        async fn release(self) -> Result<(), SeedError> {
            *self.releases.lock().unwrap() += 1;
            if self.fail_release {
                return Err(SeedError::Release("socket closed".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn seeds_tables_in_order_and_releases_once() {
        let (target, seeded, releases) = RecordingTarget::new();
        let dataset = Dataset::placeholder();
        let mut orchestrator = Orchestrator::new();

        let report = orchestrator
            .run(async { Ok(target) }, &dataset)
            .await
            .unwrap();

        assert_eq!(*seeded.lock().unwrap(), Table::SEED_ORDER.to_vec());
        assert_eq!(*releases.lock().unwrap(), 1);
        assert_eq!(report.inserted(), dataset.len());
        assert_eq!(report.skipped(), 0);
        assert_eq!(orchestrator.state(), RunState::Done);
        assert_eq!(
            orchestrator.history(),
            &[
                RunState::Idle,
                RunState::Connecting,
                RunState::Seeding(Table::Users),
                RunState::Seeding(Table::Customers),
                RunState::Seeding(Table::Invoices),
                RunState::Seeding(Table::Revenue),
                RunState::Closing,
                RunState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn failure_stops_later_tables_and_still_releases() {
        let (mut target, seeded, releases) = RecordingTarget::new();
        target.fail_on = Some(Table::Customers);
        let mut orchestrator = Orchestrator::new();

        let err = orchestrator
            .run(async { Ok(target) }, &Dataset::placeholder())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SeedError::Insert {
                table: Table::Customers,
                ..
            }
        ));
        assert_eq!(
            *seeded.lock().unwrap(),
            vec![Table::Users, Table::Customers]
        );
        assert_eq!(*releases.lock().unwrap(), 1);
        assert_eq!(
            &orchestrator.history()[3..],
            &[
                RunState::Seeding(Table::Customers),
                RunState::Closing,
                RunState::Failed
            ]
        );
    }

    #[tokio::test]
    async fn seeding_error_wins_over_release_error() {
        let (mut target, _, releases) = RecordingTarget::new();
        target.fail_on = Some(Table::Revenue);
        target.fail_release = true;
        let mut orchestrator = Orchestrator::new();

        let err = orchestrator
            .run(async { Ok(target) }, &Dataset::placeholder())
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Insert { .. }));
        assert_eq!(*releases.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn release_error_fails_an_otherwise_clean_run() {
        let (mut target, _, releases) = RecordingTarget::new();
        target.fail_release = true;
        let mut orchestrator = Orchestrator::new();

        let err = orchestrator
            .run(async { Ok(target) }, &Dataset::placeholder())
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Release(_)));
        assert_eq!(*releases.lock().unwrap(), 1);
        assert_eq!(orchestrator.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn acquire_failure_seeds_nothing() {
        let mut orchestrator = Orchestrator::new();

        let err = orchestrator
            .run(
                async { Err::<RecordingTarget, _>(SeedError::Connect(sqlx::Error::PoolTimedOut)) },
                &Dataset::placeholder(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Connect(_)));
        assert_eq!(
            orchestrator.history(),
            &[RunState::Idle, RunState::Connecting, RunState::Failed]
        );
    }
}
