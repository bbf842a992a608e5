//! Heading derivation for rotating marker icons.

use crate::geo::{self, LatLng};
use crate::render::PositionSink;

/// Tracks the heading of the active segment and pushes it to the renderer.
///
/// The heading is the initial bearing from the segment's start to its end,
/// computed once per segment, never interpolated within one. Only built when
/// rotation was requested; a controller without one never touches the
/// renderer's heading sink.
#[derive(Debug, Clone)]
pub struct RotationAdapter {
    heading: f64,
}

impl RotationAdapter {
    pub fn new() -> Self {
        Self { heading: 0.0 }
    }

    /// Recomputes the heading for the segment `from -> to` and informs the
    /// renderer.
    pub fn apply<R: PositionSink>(&mut self, renderer: &mut R, from: LatLng, to: LatLng) {
        self.heading = geo::bearing_deg(from, to);
        renderer.set_heading(self.heading);
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }
}

impl Default for RotationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct HeadingProbe {
        headings: Rc<RefCell<Vec<f64>>>,
    }

    impl PositionSink for HeadingProbe {
        fn set_position(&mut self, _position: LatLng) {}
        fn set_heading(&mut self, degrees: f64) {
            self.headings.borrow_mut().push(degrees);
        }
    }

    #[test]
    fn heading_follows_the_segment() {
        let mut probe = HeadingProbe::default();
        let mut adapter = RotationAdapter::new();

        adapter.apply(&mut probe, LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert!((adapter.heading() - 90.0).abs() < 0.1);

        adapter.apply(&mut probe, LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0));
        assert!(adapter.heading().abs() < 0.1);

        let headings = probe.headings.borrow();
        assert_eq!(headings.len(), 2);
        assert!((headings[0] - 90.0).abs() < 0.1);
    }
}
