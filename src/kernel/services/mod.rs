//! Everything the kernel needs from outside the process.
//!
//! - `ports`: the project server contract and the settings schema.
//! - `adapters`: HTTP client, settings/log locations and the async runtime
//!   that turns effects into `AppMessage`s.

pub mod adapters;
pub mod ports;
