//! Abstraction traits used by the bridge (CAN bus, serial link, indicator, timer).
pub mod bridge_timer;
pub mod can_bus;
pub mod indicator;
pub mod serial_link;
