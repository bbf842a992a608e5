use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use marker_motion::{
    LatLng, MotionController, MotionOptions, PositionSink, SystemClock, TickSource, load_config,
};

/// Drives a marker along a configured route with wall-clock frame ticks.
#[derive(Debug, Parser)]
#[command(name = "motion-demo", about = "Replay a marker route in the terminal")]
struct Args {
    /// Path to the TOML configuration.
    #[arg(long, default_value = "marker.toml")]
    config: PathBuf,
    /// Override the configured speed (km/h).
    #[arg(long)]
    speed_kmh: Option<f64>,
    /// Animation frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Stop after this many seconds, even when looping.
    #[arg(long)]
    duration: Option<f64>,
}

/// Renderer that reports the marker through the log instead of a map widget.
struct ConsoleRenderer {
    icon: Option<String>,
}

impl PositionSink for ConsoleRenderer {
    fn set_position(&mut self, position: LatLng) {
        tracing::debug!(lat = position.lat, lng = position.lng, "position");
    }

    fn set_heading(&mut self, degrees: f64) {
        tracing::debug!(heading = degrees, icon = self.icon.as_deref(), "heading");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    tracing::info!("Loading configuration from: {}", args.config.display());
    let config = load_config(&args.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", args.config.display(), e);
        e
    })?;
    let base_dir = args.config.parent().unwrap_or_else(|| std::path::Path::new("."));
    let route = config.route.load(base_dir)?;

    let speed_kmh = args.speed_kmh.unwrap_or(config.motion.speed_kmh);
    let options: MotionOptions = config.motion.options.clone();
    tracing::info!(
        waypoints = route.len(),
        speed_kmh,
        rotation = options.rotation,
        autoplay = options.autoplay,
        looped = options.looped,
        "starting marker replay"
    );

    let clock = SystemClock::new();
    let timeline = clock.clone();
    let renderer = ConsoleRenderer {
        icon: options.icon.clone(),
    };
    let mut controller = MotionController::new(route, speed_kmh, options, renderer, clock)?;
    controller.on(|event| {
        tracing::info!("{event}");
    });
    if !controller.is_moving() {
        controller.start();
    }

    let frame = Duration::from_secs_f64(1.0 / args.fps);
    let deadline = args.duration.map(Duration::from_secs_f64);
    let mut frames = tokio::time::interval(frame);
    loop {
        frames.tick().await;
        let now = timeline.now();
        controller.tick(now);
        if controller.is_ended() {
            break;
        }
        if let Some(deadline) = deadline {
            if now >= deadline {
                tracing::info!("duration cap reached, stopping");
                break;
            }
        }
    }

    let end = controller.position();
    tracing::info!(lat = end.lat, lng = end.lng, state = ?controller.state(), "replay finished");
    Ok(())
}
