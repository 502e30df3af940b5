pub mod candidate;
pub mod frame;
pub mod pulse;
pub mod servo_driver;
pub mod target_detector;
pub mod target_selector;
