//! marker-motion: the motion-timing and interpolation engine underneath a
//! map-marker widget.
//!
//! A [`MotionController`] moves a point entity along a polyline of
//! geographic waypoints at a configurable real-world speed, driven by
//! animation ticks from an injected [`TickSource`]. It supports
//! play/pause/reset, mid-flight speed changes, optional looping, derives an
//! icon heading per segment when rotation is enabled, and emits synchronous
//! lifecycle events. Rendering stays behind the [`PositionSink`] seam; this
//! crate never draws anything.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod geo;
pub mod motion;
pub mod render;

pub use clock::{ManualClock, SystemClock, TickHandle, TickSource};
pub use config::{Config, ConfigError, MotionOptions, load_config};
pub use error::MotionError;
pub use events::MotionEvent;
pub use geo::LatLng;
pub use motion::{MotionController, MotionState};
pub use render::{NullSink, PositionSink};
