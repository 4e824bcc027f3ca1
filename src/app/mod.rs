pub mod render;

#[cfg(feature = "cli")]
pub use render::{render_lookups, render_results};
pub use render::{describe_filters, render_window, ResultView};
