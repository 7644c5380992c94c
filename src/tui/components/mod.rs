//! Reusable UI components shared by every view.

pub mod footer;
pub mod pair_input;
pub mod status_bar;
pub mod tab_bar;
