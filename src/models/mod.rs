//! Wire and domain models.
//!
//! [`Symbol`] is the canonical instrument identifier, [`Tick`] the decoded
//! 24h ticker event, and [`PriceResponse`] the conversion rate payload.

pub mod rate;
pub mod symbol;
pub mod ticker;

pub use rate::PriceResponse;
pub use symbol::Symbol;
pub use ticker::{Tick, TickerEnvelope};
