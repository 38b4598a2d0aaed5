//! Minimal abstraction for an asynchronous CAN transmitter. Reception is
//! interrupt driven and enters the library through
//! [`CanRxHandler`](crate::protocol::bridge::CanRxHandler) instead.
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to send CAN frames asynchronously.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Asynchronous to accommodate non-blocking drivers.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
}
