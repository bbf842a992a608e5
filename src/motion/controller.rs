//! The segment-stepping motion controller.

use std::time::Duration;

use crate::clock::{TickHandle, TickSource};
use crate::config::MotionOptions;
use crate::error::MotionError;
use crate::events::{EventListeners, MotionEvent};
use crate::geo::{self, LatLng};
use crate::motion::interpolate;
use crate::motion::rotation::RotationAdapter;
use crate::motion::MotionState;
use crate::render::PositionSink;

/// Moves a point entity along a polyline path at a real-world speed.
///
/// The controller is a time-driven state machine: the host delivers ticks
/// with monotonic timestamps from the injected [`TickSource`], and the
/// controller interpolates the entity's position along the active segment,
/// advancing across segment boundaries as wall-clock time accrues. Distance
/// covered is governed purely by elapsed time divided into each segment's
/// duration, so variable frame timing never changes the average speed.
///
/// All control flow is synchronous and single-threaded; at most one tick is
/// outstanding at any moment.
pub struct MotionController<R: PositionSink, C: TickSource> {
    path: Vec<LatLng>,
    /// Meters per second, always > 0.
    speed: f64,
    options: MotionOptions,
    state: MotionState,

    /// Segment currently being traversed, in `[0, path.len() - 2]` while the
    /// entity is en route; equals the last waypoint index once `Ended`.
    segment: usize,
    /// Fraction of the current segment already completed at the last boundary
    /// crossing. Reset to 0 only on the Ready -> Moving transition.
    segment_progress: f64,
    segment_started_at: Option<Duration>,
    paused_at: Option<Duration>,

    position: LatLng,
    pending: Option<TickHandle>,
    rotation: Option<RotationAdapter>,

    renderer: R,
    clock: C,
    listeners: EventListeners,
}

impl<R: PositionSink, C: TickSource> Drop for MotionController<R, C> {
    /// A destroyed controller leaves no tick armed behind it.
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }
    }
}

impl<R: PositionSink, C: TickSource> MotionController<R, C> {
    /// Builds a controller over `path`, travelling at `speed_kmh`.
    ///
    /// Fails with [`MotionError`] if the path has fewer than two waypoints or
    /// the speed is not a positive finite number. With `autoplay` set, motion
    /// begins immediately.
    pub fn new(
        path: Vec<LatLng>,
        speed_kmh: f64,
        options: MotionOptions,
        renderer: R,
        clock: C,
    ) -> Result<Self, MotionError> {
        interpolate::validate_path(&path)?;
        let speed = interpolate::speed_mps(speed_kmh)?;

        let position = path[0];
        let rotation = options.rotation.then(RotationAdapter::new);
        let mut controller = Self {
            path,
            speed,
            options,
            state: MotionState::Ready,
            segment: 0,
            segment_progress: 0.0,
            segment_started_at: None,
            paused_at: None,
            position,
            pending: None,
            rotation,
            renderer,
            clock,
            listeners: EventListeners::new(),
        };
        controller.renderer.set_position(position);
        controller.apply_heading();
        if controller.options.autoplay {
            controller.start();
        }
        Ok(controller)
    }

    /// Registers a lifecycle listener. Listeners fire synchronously, in
    /// registration order, inside the call that triggers them.
    pub fn on<F>(&mut self, listener: F)
    where
        F: FnMut(&MotionEvent) + 'static,
    {
        self.listeners.register(listener);
    }

    /// Starts motion from `Ready`, or resumes it from `Paused`.
    ///
    /// Resuming shifts the segment timing window forward by the pause gap, so
    /// elapsed-time accounting never includes paused wall-clock time. A no-op
    /// from `Moving` or `Ended`.
    pub fn start(&mut self) {
        match self.state {
            MotionState::Ready => {
                let now = self.clock.now();
                self.segment_progress = 0.0;
                self.segment_started_at = Some(now);
                self.set_position(self.path[0]);
                self.state = MotionState::Moving;
                self.pending = Some(self.clock.schedule());
                tracing::debug!(?now, "motion started");
                self.listeners.emit(MotionEvent::Start);
            }
            MotionState::Paused => {
                let now = self.clock.now();
                if let (Some(paused_at), Some(started)) =
                    (self.paused_at.take(), self.segment_started_at)
                {
                    let gap = now.saturating_sub(paused_at);
                    self.segment_started_at = Some(started + gap);
                }
                self.state = MotionState::Moving;
                self.pending = Some(self.clock.schedule());
                tracing::debug!(?now, "motion resumed");
                self.listeners.emit(MotionEvent::Start);
            }
            MotionState::Moving | MotionState::Ended => {}
        }
    }

    /// Pauses motion, snapshotting the interpolated position at the moment of
    /// the call. A no-op unless `Moving`.
    pub fn pause(&mut self) {
        if self.state != MotionState::Moving {
            return;
        }
        let now = self.clock.now();
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }
        let snapshot = self.position_at(now);
        self.set_position(snapshot);
        self.paused_at = Some(now);
        self.state = MotionState::Paused;
        tracing::debug!(?now, "motion paused");
        self.listeners.emit(MotionEvent::Pause);
    }

    /// Returns the entity to the path's first waypoint and state `Ready`,
    /// from any state. Restarts immediately when autoplay is configured.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }
        self.segment = 0;
        self.segment_progress = 0.0;
        self.segment_started_at = None;
        self.paused_at = None;
        self.state = MotionState::Ready;
        self.set_position(self.path[0]);
        self.apply_heading();
        tracing::debug!("motion reset");
        self.listeners.emit(MotionEvent::Reset);
        if self.options.autoplay {
            self.start();
        }
    }

    /// Changes the travel speed, effective from the next tick.
    ///
    /// The segment timing window is deliberately left in place, so the next
    /// tick may show a small position discontinuity (the elapsed portion of
    /// the segment is re-priced at the new speed); interpolation is smooth
    /// again from the following tick. Fails on a non-positive speed, leaving
    /// state and timing untouched.
    pub fn set_speed(&mut self, speed_kmh: f64) -> Result<(), MotionError> {
        let speed = interpolate::speed_mps(speed_kmh)?;
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }
        self.speed = speed;
        if self.state == MotionState::Moving {
            self.pending = Some(self.clock.schedule());
        }
        tracing::debug!(speed_kmh, "speed changed");
        Ok(())
    }

    /// Delivers the scheduled animation tick.
    ///
    /// `timestamp` must come from the same tick source the controller owns.
    /// A no-op unless the controller is `Moving` with a tick outstanding, so
    /// a stale callback delivered after `pause()` or `reset()` cannot corrupt
    /// timing state.
    pub fn tick(&mut self, timestamp: Duration) {
        if self.state != MotionState::Moving {
            return;
        }
        if self.pending.take().is_none() {
            return;
        }

        loop {
            let started = match self.segment_started_at {
                Some(started) => started,
                None => {
                    self.segment_started_at = Some(timestamp);
                    timestamp
                }
            };
            let elapsed = timestamp.saturating_sub(started).as_secs_f64();
            let from = self.path[self.segment];
            let to = self.path[self.segment + 1];
            let segment_duration = geo::distance_m(from, to) / self.speed;

            // Coincident waypoints make a zero-duration segment: complete it
            // instantly rather than dividing by zero.
            let total_progress = if segment_duration == 0.0 {
                1.0
            } else {
                self.segment_progress + elapsed / segment_duration
            };

            if total_progress < 1.0 {
                self.set_position(interpolate::lerp(from, to, total_progress));
                self.pending = Some(self.clock.schedule());
                return;
            }

            // Boundary crossed.
            self.segment += 1;
            self.listeners.emit(MotionEvent::Segment { index: self.segment });

            if self.segment >= self.path.len() - 1 {
                self.set_position(self.path[self.path.len() - 1]);
                self.segment_started_at = None;
                self.state = MotionState::Ended;
                tracing::debug!(?timestamp, "motion ended");
                self.listeners.emit(MotionEvent::End);
                if self.options.looped {
                    self.reset();
                    self.start();
                }
                return;
            }

            // Carry the fractional overshoot into the new segment so no
            // travel time is lost or double-counted. A carry >= 1 (stalled
            // frames across short segments) advances again on the next pass.
            self.segment_started_at = Some(timestamp);
            self.segment_progress = if segment_duration == 0.0 {
                0.0
            } else {
                total_progress - 1.0
            };
            tracing::trace!(segment = self.segment, carry = self.segment_progress, "segment advance");
            self.apply_heading();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == MotionState::Ready
    }

    pub fn is_moving(&self) -> bool {
        self.state == MotionState::Moving
    }

    pub fn is_paused(&self) -> bool {
        self.state == MotionState::Paused
    }

    pub fn is_ended(&self) -> bool {
        self.state == MotionState::Ended
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Last published position of the entity.
    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Heading of the active segment, when rotation is enabled.
    pub fn heading(&self) -> Option<f64> {
        self.rotation.as_ref().map(RotationAdapter::heading)
    }

    pub fn path(&self) -> &[LatLng] {
        &self.path
    }

    /// Index of the segment being traversed (or arrived at, once `Ended`).
    pub fn current_segment(&self) -> usize {
        self.segment
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed * 3600.0 / 1000.0
    }

    pub fn options(&self) -> &MotionOptions {
        &self.options
    }

    /// Interpolated position at `timestamp` within the active segment,
    /// clamped to the segment's end.
    fn position_at(&self, timestamp: Duration) -> LatLng {
        let Some(started) = self.segment_started_at else {
            return self.position;
        };
        let from = self.path[self.segment];
        let to = self.path[self.segment + 1];
        let segment_duration = geo::distance_m(from, to) / self.speed;
        if segment_duration == 0.0 {
            return to;
        }
        let elapsed = timestamp.saturating_sub(started).as_secs_f64();
        let total_progress = (self.segment_progress + elapsed / segment_duration).min(1.0);
        interpolate::lerp(from, to, total_progress)
    }

    fn set_position(&mut self, position: LatLng) {
        self.position = position;
        self.renderer.set_position(position);
    }

    fn apply_heading(&mut self) {
        if let Some(rotation) = &mut self.rotation {
            let from = self.path[self.segment];
            let to = self.path[self.segment + 1];
            rotation.apply(&mut self.renderer, from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::render::NullSink;

    fn two_point_path() -> Vec<LatLng> {
        vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0)]
    }

    #[test]
    fn new_controller_is_ready_at_the_first_waypoint() {
        let controller = MotionController::new(
            two_point_path(),
            1000.0,
            MotionOptions::default(),
            NullSink,
            ManualClock::new(),
        )
        .unwrap();
        assert!(controller.is_ready());
        assert!(!controller.is_moving());
        assert!(!controller.is_paused());
        assert!(!controller.is_ended());
        assert_eq!(controller.position(), LatLng::new(0.0, 0.0));
        assert_eq!(controller.current_segment(), 0);
    }

    #[test]
    fn construction_rejects_short_paths_and_bad_speeds() {
        let one_point = vec![LatLng::new(0.0, 0.0)];
        assert!(matches!(
            MotionController::new(
                one_point,
                1000.0,
                MotionOptions::default(),
                NullSink,
                ManualClock::new()
            ),
            Err(MotionError::PathTooShort(1))
        ));
        assert!(matches!(
            MotionController::new(
                two_point_path(),
                0.0,
                MotionOptions::default(),
                NullSink,
                ManualClock::new()
            ),
            Err(MotionError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn start_is_a_no_op_once_ended() {
        let clock = ManualClock::new();
        let mut controller = MotionController::new(
            two_point_path(),
            1000.0,
            MotionOptions::default(),
            NullSink,
            clock.clone(),
        )
        .unwrap();
        controller.start();
        clock.set(Duration::from_secs(100_000));
        controller.tick(clock.now());
        assert!(controller.is_ended());
        controller.start();
        assert!(controller.is_ended(), "start must not leave Ended");
    }

    #[test]
    fn speed_is_reported_back_in_kmh() {
        let controller = MotionController::new(
            two_point_path(),
            1234.5,
            MotionOptions::default(),
            NullSink,
            ManualClock::new(),
        )
        .unwrap();
        assert!((controller.speed_kmh() - 1234.5).abs() < 1e-9);
    }
}
