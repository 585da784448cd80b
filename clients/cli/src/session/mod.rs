pub mod headless_mode;
pub mod setup;
pub mod tui_mode;

pub use headless_mode::{Listing, download_report, list_module, resumen_table};
pub use setup::{Session, SessionData, setup_session};
pub use tui_mode::run_tui_mode;
