// Adapters layer: concrete implementations of the domain ports.

pub mod address_bar;
pub mod http;

pub use address_bar::MemoryAddressBar;
pub use http::ApiClient;
