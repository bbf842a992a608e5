//! Deterministic marker replay against a synthetic clock.
//!
//! Runs the motion controller frame by frame with manually advanced
//! timestamps, so a route always produces the same trajectory regardless of
//! host timing. Useful for eyeballing segment pacing and for regression runs.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;

use marker_motion::geo::distance_m;
use marker_motion::{
    LatLng, ManualClock, MotionController, MotionEvent, MotionOptions, PositionSink, TickSource,
};

#[derive(Debug, Parser)]
#[command(name = "motion_simulator", about = "Frame-by-frame marker replay on a synthetic clock")]
struct Args {
    /// Synthetic frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Travel speed in km/h.
    #[arg(long, default_value_t = 4000.0)]
    speed_kmh: f64,
    /// Derive an icon heading per segment.
    #[arg(long)]
    rotation: bool,
    /// Hard cap on simulated frames.
    #[arg(long, default_value_t = 1_000_000)]
    max_frames: u64,
}

#[derive(Default)]
struct Telemetry {
    position_updates: u64,
    heading_updates: u64,
    last_position: Option<LatLng>,
}

#[derive(Clone, Default)]
struct TelemetrySink {
    telemetry: Rc<RefCell<Telemetry>>,
}

impl PositionSink for TelemetrySink {
    fn set_position(&mut self, position: LatLng) {
        let mut telemetry = self.telemetry.borrow_mut();
        telemetry.position_updates += 1;
        telemetry.last_position = Some(position);
    }

    fn set_heading(&mut self, degrees: f64) {
        self.telemetry.borrow_mut().heading_updates += 1;
        tracing::debug!(heading = degrees, "heading");
    }
}

/// The demo delivery loop; a realistic mix of long and short segments.
fn route() -> Vec<LatLng> {
    [
        [22.614407, -103.009848],
        [22.622247, -103.006986],
        [22.640489, -102.996611],
        [22.641672, -102.995121],
        [22.644173, -102.993314],
        [22.646203, -102.996537],
        [22.652985, -102.995663],
        [22.648454, -102.987019],
        [22.646342, -102.978193],
        [22.646175, -102.968946],
        [22.651401, -102.961356],
        [22.651874, -102.958555],
        [22.639483, -102.959202],
        [22.618056, -102.981606],
        [22.618216, -102.992432],
        [22.616452, -102.997295],
    ]
    .into_iter()
    .map(LatLng::from)
    .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let path = route();
    let total_distance: f64 = path.windows(2).map(|pair| distance_m(pair[0], pair[1])).sum();
    let expected_secs = total_distance / (args.speed_kmh * 1000.0 / 3600.0);
    tracing::info!(
        waypoints = path.len(),
        total_distance_m = total_distance.round(),
        speed_kmh = args.speed_kmh,
        expected_secs,
        "simulating route"
    );

    let clock = ManualClock::new();
    let timeline = clock.clone();
    let sink = TelemetrySink::default();
    let telemetry = Rc::clone(&sink.telemetry);

    let options = MotionOptions {
        rotation: args.rotation,
        ..MotionOptions::default()
    };
    let mut controller = MotionController::new(path, args.speed_kmh, options, sink, clock)?;
    let segment_times: Rc<RefCell<Vec<(usize, Duration)>>> = Rc::default();
    {
        let segment_times = Rc::clone(&segment_times);
        let timeline = timeline.clone();
        controller.on(move |event| {
            if let MotionEvent::Segment { index } = event {
                segment_times.borrow_mut().push((*index, timeline.now()));
            }
        });
    }
    controller.start();

    let frame = Duration::from_secs_f64(1.0 / args.fps);
    let mut frames = 0u64;
    while controller.is_moving() && frames < args.max_frames {
        timeline.advance(frame);
        controller.tick(timeline.now());
        frames += 1;
    }

    for (index, at) in segment_times.borrow().iter() {
        tracing::info!(segment = *index, at_secs = at.as_secs_f64(), "segment reached");
    }

    let telemetry = telemetry.borrow();
    tracing::info!(
        frames,
        simulated_secs = timeline.now().as_secs_f64(),
        expected_secs,
        position_updates = telemetry.position_updates,
        heading_updates = telemetry.heading_updates,
        ended = controller.is_ended(),
        "simulation finished"
    );
    if let Some(position) = telemetry.last_position {
        tracing::info!(lat = position.lat, lng = position.lng, "final position");
    }

    if !controller.is_ended() {
        tracing::warn!("frame cap reached before the route ended");
    }
    Ok(())
}
