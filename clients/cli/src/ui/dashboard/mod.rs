//! Dashboard screen
//!
//! Split into state, per-frame updates and rendering components

pub mod components;
pub mod renderer;
pub mod state;
pub mod updaters;
pub mod utils;

pub use renderer::render_dashboard;
pub use state::{DashboardState, SessionInfo};
pub use updaters::DashboardAction;
