//! `satbridge` library: the message-relay core of a satellite bus bridge.
//! Moves fixed-format command/telemetry messages between a CAN command bus and
//! a UART link to a ground-facing frontend in a `no_std`, allocation-free way.
//! The crate exposes the infrastructure modules (frame codec, SPSC queue), the
//! protocol logic (command catalog, transports, bridge router) and the shared
//! data types.
#![no_std]
//==================================================================================
/// Core data types shared by the codec, the queues and the router.
pub mod core;
/// Decode, queue, CAN mapping and delivery errors.
pub mod error;
/// Frame codec and bounded single-producer/single-consumer queue.
pub mod infra;
/// Command catalog, transport abstractions and the bridge router.
pub mod protocol;
//==================================================================================
