//! High-level components of the relay: the command catalog, the CAN/UART
//! transport layer, and the bridge router wiring both directions together.
pub mod bridge;
pub mod catalog;
pub mod transport;
