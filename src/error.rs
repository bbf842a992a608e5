use thiserror::Error;

/// Errors raised when building a controller or mutating its speed.
///
/// All variants are synchronous argument failures: construction aborts and no
/// controller is created, `set_speed` leaves state and timing untouched.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("path must contain at least two waypoints, got {0}")]
    PathTooShort(usize),
    #[error("speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),
}
