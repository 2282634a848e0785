//! HTTP API: server and wire types.

pub mod server;
pub mod types;
