//! Serial (UART) link to the frontend, split into its two directions.
use futures_util::Future;

/// Transmit half: sends one encoded frame.
pub trait SerialTx {
    type Error: core::fmt::Debug;
    /// Write every byte of `bytes`, completing once the driver accepted them.
    fn transmit<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
}

/// Receive half, driven by the receive-complete interrupt.
pub trait SerialRx {
    /// Arm reception of the next frame. Called from interrupt context, so it
    /// must not block.
    fn rearm_receive(&mut self);
}
