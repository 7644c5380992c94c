//! Market overview views.

pub mod cards;
pub mod table;
