//! Terminal presentation of simulation state

pub mod render;
pub mod state;

pub use render::{render_status, render_tab};
pub use state::{Tab, ViewState};
