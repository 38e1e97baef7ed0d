//! Core library surface for the Book Library TUI application.
//!
//! The `bin` target wires these pieces together; the integration tests drive the
//! same catalog, store and dispatcher without a terminal.
pub mod catalog;
pub mod config;
pub mod logging;
pub mod menu;
pub mod models;
pub mod store;
pub mod ui;

/// Session state and the persistence boundary.
pub use catalog::{Catalog, SearchField, Stats};
pub use store::{Store, StoreError};

/// Menu-driven operations.
pub use menu::{dispatch, Action, MenuEntry, Outcome};

pub use config::Config;
pub use logging::init_logging;
pub use models::Book;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
