//! Small UI framework for the camdeck colour panel.

pub mod activity;
pub mod components;
pub mod theme;

pub use activity::{Activity, Context};
pub use components::{draw_wrapped, BarKey, Banner, ButtonBar, Header};
pub use theme::{layout, palette};
