// THEORY:
// This file is the main entry point for the `spotter_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (like the
// `visual_tester` demo binary).
//
// The engine splits into two independently testable halves that compose at
// the top level:
// - acquisition: `Frame` → `target_detector` → `target_selector`, wrapped
//   by `pipeline::AcquisitionPipeline` with single-shot trigger semantics;
// - actuation: `pulse` (angle → pulse width → duty cycle) wrapped by
//   `servo_driver::ServoDriver` over an injected `PwmSink`.
// The acquisition side may command the actuation side (via
// `pipeline::aim_angle`), but neither half knows about cameras, windows,
// or GPIO chips — those stay with the caller.

pub mod core_modules;
pub mod error;
pub mod pipeline;
