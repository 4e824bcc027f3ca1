pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ApiClient, MemoryAddressBar};
pub use config::TomlConfig;
pub use crate::core::{
    auth::{AuthContext, AuthPhase},
    executor::{SearchExecutor, SearchOutcome, SearchState},
    filter_state::FilterState,
    pagination::{page_window, PaginationControls},
    session::SearchSession,
};
pub use domain::model::{DeveloperSummary, LookupTables, PageResult, PageSize};
pub use utils::error::{FinderError, Result};
