//! # DSP (Digital Signal Processing) Core
//!
//! Everything here is host-agnostic and realtime-safe: buffers are sized in
//! `prepare()` and never touched by the allocator while processing.
//!
//! Leaves first:
//!
//! - **`sample`**: the [`Sample`](sample::Sample) trait that lets every
//!   block run in `f32` or `f64`.
//! - **`delay_line`**: a ring buffer with exact and linearly interpolated
//!   reads. Everything else is built on it.
//! - **`ramp`**: per-sample linear smoothing of control values.
//! - **`comb`**: a feedback comb filter whose gain comes from a decay time.
//! - **`allpass`**: a Schroeder all-pass filter for echo density.
//! - **`reverb`**: four parallel combs into two series all-passes.
//! - **`chorus`**: an LFO-modulated delay per channel.

pub mod allpass;
pub mod chorus;
pub mod comb;
pub mod delay_line;
pub mod ramp;
pub mod reverb;
pub mod sample;

/// Channels the comb and all-pass filters keep state for. Any further
/// channels are passed through untouched.
pub const FILTER_CHANNELS: usize = 2;
