//! Database integration for seeding fixture data.
//!
//! The [`Seeder`] creates each table on demand and loads its rows with
//! concurrent conflict-skipping inserts.

mod seeder;

pub use seeder::{SeedError, Seeder, TableReport};
