//! odbc-cell - run SQL over ODBC the way a notebook cell does.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod instance;
pub mod logging;
pub mod query;
pub mod render;
pub mod script;
pub mod secrets;
pub mod session;

pub use session::Session;
