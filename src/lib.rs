//! Browse employee expense transactions from a terminal.
//!
//! [`app::App`] coordinates three accessors over an [`api::ExpenseSource`]
//! and decides which transaction set is shown; [`views`] renders it and
//! [`commands`] turns typed lines into coordinator events.

pub mod accessors;
pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod utils;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use app::App;
pub use error::AppError;
