// THEORY:
// The `error` module defines the crate's full failure taxonomy. The three
// enums map one-to-one onto the three ways this system can fail, and each
// carries a different severity contract:
//
// 1.  `ConfigError` — invalid static configuration. Fatal: constructors
//     return it instead of producing a half-valid component, so a component
//     that exists is always safe to use.
// 2.  `ActuationError` — a transport failure reported by the PWM sink.
//     Recoverable: the driver surfaces it with its state unchanged and stays
//     usable for subsequent commands.
// 3.  `FrameError` — a malformed pixel buffer handed to `Frame::new`. A
//     caller bug, rejected before any processing starts.
//
// An ambiguous target selection (a tie) is NOT an error anywhere in this
// crate; it is a defined "no winner" outcome. The pure computational modules
// never catch or suppress errors — they validate inputs and fail
// immediately. Only the servo driver absorbs transport faults, and only in
// the sense of leaving its own state consistent.

use thiserror::Error;

/// Invalid static configuration, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The angle range is empty or inverted; the pulse interpolation would
    /// divide by zero.
    #[error("degenerate angle range: min {min}° must be below max {max}°")]
    DegenerateAngleRange { min: f64, max: f64 },

    /// Pulse bounds must satisfy `0 < min < max`.
    #[error("invalid pulse width range: {min_us}µs..{max_us}µs")]
    InvalidPulseRange { min_us: f64, max_us: f64 },

    /// A pulse wider than the PWM period would demand a duty cycle above
    /// 100%.
    #[error("max pulse width {max_us}µs exceeds the {period_us}µs PWM period")]
    PulseExceedsPeriod { max_us: f64, period_us: f64 },

    #[error("PWM frequency must be positive, got {0} Hz")]
    InvalidFrequency(f64),

    #[error("sweep step must be positive, got {0}°")]
    InvalidStep(f64),

    /// The aspect-ratio window must satisfy `0 < lo < hi`.
    #[error("invalid aspect ratio window: ({lo}, {hi})")]
    InvalidAspectWindow { lo: f64, hi: f64 },
}

/// A PWM sink reported a transport failure. The commanded angle is not
/// committed and the driver remains usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActuationError {
    #[error("pwm transport failure on pin {pin}: {message}")]
    Transport { pin: u8, message: String },
}

/// A malformed pixel buffer was handed to `Frame::new`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("frame buffer is empty")]
    EmptyBuffer,

    #[error("frame dimensions are zero: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    /// The buffer does not hold `width * height` three-channel pixels.
    #[error("buffer of {len} bytes does not match {width}x{height}x3")]
    SizeMismatch { len: usize, width: u32, height: u32 },
}

/// Top-level error for call sites that cross component boundaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Actuation(#[from] ActuationError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}
