//! Common scalar types

/// Wall-clock or simulation time in seconds.
pub type Seconds = f64;

/// A rate in steps (or frames) per second.
pub type FramesPerSecond = f64;
