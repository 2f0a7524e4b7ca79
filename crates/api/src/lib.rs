//! HTTP surface over the synthd engine.
//!
//! Exposes the read-only position views plus the position and liquidation
//! operations as JSON endpoints. The binary wires the engine to an
//! in-memory sandbox (static feeds, in-memory token ledgers) so it runs
//! self-contained.

pub mod routes;
pub mod sandbox;
pub mod state;
