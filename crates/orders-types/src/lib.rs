//! orders-types: domain model and data-store ports shared by every adapter.

pub mod domain;
pub mod ports;
