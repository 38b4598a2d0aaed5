//! Infrastructure shared by both relay directions: the fixed-width frame
//! codec and the lock-free bounded queue handing messages from interrupt
//! context to worker tasks.
pub mod codec;
pub mod queue;
