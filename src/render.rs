//! Renderer contract consumed by the controller.
//!
//! The controller is polymorphic only over this small sink capability; it
//! never knows which widget toolkit (if any) is drawing the entity.

use crate::geo::LatLng;

/// Receives position updates and, when rotation is enabled, heading updates.
pub trait PositionSink {
    fn set_position(&mut self, position: LatLng);

    /// Heading in degrees true, `[0, 360)`. Only called when the controller
    /// was built with rotation enabled; sinks that cannot rotate an icon keep
    /// the default no-op.
    fn set_heading(&mut self, _degrees: f64) {}
}

/// Sink that discards every update. Useful for benchmarks and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PositionSink for NullSink {
    fn set_position(&mut self, _position: LatLng) {}
}
