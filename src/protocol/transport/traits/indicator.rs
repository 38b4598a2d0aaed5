//! Activity indicator (typically an LED).

/// Binary output switched by the notifier.
pub trait Indicator {
    fn activate(&mut self);
    fn deactivate(&mut self);
}
