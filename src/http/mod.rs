//! # HTTP Model & Transport
//!
//! Request/response value types plus the `Transport` seam the chain runner
//! dispatches through. The reqwest-backed adapter lives in [`client`]; tests
//! substitute their own `Transport` implementations.

pub mod client;
pub mod method;
pub mod request;
pub mod response;
pub mod transport;
