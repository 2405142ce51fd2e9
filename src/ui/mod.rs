//! UI modules for the Motry window
//!
//! Rendering only: every interaction is pushed to the session as an event.

mod components;
pub mod theme;
mod vehicle;

pub use components::{
    render_about_dialog, render_alerts, render_busy_overlay, render_confirm_dialog, render_modal,
    render_top_bar,
};
pub use vehicle::render_vehicle_view;
