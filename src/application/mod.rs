//! Application layer: port contracts and lifecycle services.

pub mod ports;
pub mod services;
