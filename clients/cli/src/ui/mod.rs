// Module declarations
mod app;
pub mod dashboard;
pub mod debounce;
pub mod form;
pub mod metrics;
pub mod module;
pub mod screen;
pub mod shell;
pub mod splash;
pub mod table;
// Re-exports for external use
pub use app::{App, UIConfig, run};
