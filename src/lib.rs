//! bctoolkit: maps `<resource> [<subresource>] <action> [args]` onto the
//! BigCommerce management API.
//!
//! The pipeline is registry → composer → dispatcher → emitter; each stage
//! lives in its own module so it can be exercised without the network.

pub mod app;
pub mod args;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod pagination;
pub mod payload;
pub mod print;
pub mod registry;
pub mod telemetry;
pub mod transport;
pub mod verb;
