//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the provenance ledger.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `SupplyChainApi`
//! - **Driven Ports (Outbound)**: `Clock`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
