//! Fixture seeding for the invoice dashboard.
//!
//! Creates the `users`, `customers`, `invoices` and `revenue` tables if they
//! are missing and loads the placeholder dataset into them. Every insert skips
//! rows whose key already exists, so a run can be repeated safely.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! let report = Orchestrator::new()
//!     .seed(&config, &Dataset::placeholder())
//!     .await?;
//! ```

pub mod config;
pub mod db;
pub mod fixtures;
pub mod orchestrator;
pub mod schema;

pub use db::{SeedError, Seeder, TableReport};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedError, Seeder, TableReport};
    pub use crate::fixtures::{Dataset, SeedUser};
    pub use crate::orchestrator::{Orchestrator, RunReport, RunState, SeedTarget};
    pub use crate::schema::Table;
}
