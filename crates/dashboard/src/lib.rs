//! Invoice dashboard core.
//!
//! Domain models for users, customers, invoices and monthly revenue, the
//! credential hasher, and the read-only queries the dashboard pages render.

pub mod auth;
pub mod database;
pub mod errors;
pub mod models;
