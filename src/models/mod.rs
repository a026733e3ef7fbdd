//! Data models and schemas for the busline API.
//!
//! Row types map one-to-one onto database tables and derive `sqlx::FromRow`;
//! request and view types carry the JSON contract and derive `Apiv2Schema`.

pub mod accounts;
pub mod api;
pub mod audit;
pub mod booking;
pub mod conductor;
pub mod fleet;
pub mod money;
pub mod reports;
pub mod tracking;

pub use accounts::*;
pub use api::*;
pub use audit::*;
pub use booking::*;
pub use conductor::*;
pub use fleet::*;
pub use money::*;
pub use reports::*;
pub use tracking::*;
