//! Input field state.

pub mod text_input;
