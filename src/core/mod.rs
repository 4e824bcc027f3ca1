pub mod auth;
pub mod debounce;
pub mod executor;
pub mod filter_state;
pub mod pagination;
pub mod session;

pub use crate::domain::model::{DeveloperSummary, LookupTables, PageResult, PageSize};
pub use crate::domain::ports::{AccountApi, AddressBar, ConfigProvider, ReferenceApi, SearchApi};
pub use crate::utils::error::Result;
