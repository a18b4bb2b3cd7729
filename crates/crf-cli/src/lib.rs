//! Shared infrastructure for the CRF definition CLI.

pub mod logging;
