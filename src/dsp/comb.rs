//! # Feedback Comb Filter
//!
//! A comb filter feeds its own output back into a delay line:
//!
//! ```text
//! y[n] = x[n] + sign * g * y[n - D]
//! ```
//!
//! An impulse comes out as a train of echoes spaced `D` samples apart,
//! each `g` times quieter than the last. In the frequency domain those
//! evenly spaced echoes become evenly spaced resonant peaks at multiples
//! of `sample_rate / D`, the "teeth" that give the filter its name.
//!
//! ## Decay Time Instead of Gain
//!
//! Nobody thinks in feedback gains, so [`CombFilter::set_feedback`] takes a
//! decay time in seconds (RT60: how long until the echoes are 60 dB
//! down) and derives the gain from it. After `t` seconds the signal has
//! gone around the loop `t * sample_rate / D` times, and each trip
//! multiplies it by `g`. Solving `g^(t * sr / D) = 10^(-60/20)`:
//!
//! ```text
//! g = 10^(-3 * D / (t * sample_rate))
//! ```

use nih_plug::nih_debug_assert;

use super::delay_line::DelayLine;
use super::sample::{ms_to_samples, Sample};
use super::FILTER_CHANNELS;

/// Shortest decay time accepted by [`CombFilter::set_feedback`]. Anything at
/// or below zero would divide by zero (or flip the exponent's sign).
pub const MIN_DECAY_SECONDS: f64 = 0.001;

/// The derived gain is clamped to `±FEEDBACK_LIMIT` so that very long decay
/// times can't push the loop to (or past) unity.
const FEEDBACK_LIMIT: f64 = 0.95;

/// One feedback comb per channel, sharing a delay time and gain.
#[derive(Debug, Clone)]
pub struct CombFilter<T: Sample> {
    delay_ms: T,
    /// `delay_ms` at the current sample rate. Fractional.
    delay_samples: T,
    sample_rate: T,
    feedback: T,
    /// `-1` or `+1`, applied to the feedback path.
    phase_sign: T,
    prepared: bool,
    lines: [DelayLine<T>; FILTER_CHANNELS],
}

impl<T: Sample> CombFilter<T> {
    /// A comb with the given loop delay. Nothing is allocated until
    /// [`prepare`](Self::prepare).
    pub fn new(delay_ms: T) -> Self {
        let sample_rate = T::from_f64(44100.0);
        Self {
            delay_ms,
            delay_samples: ms_to_samples(delay_ms, sample_rate),
            sample_rate,
            feedback: T::ZERO,
            phase_sign: T::ONE,
            prepared: false,
            lines: Default::default(),
        }
    }

    /// Change the loop delay.
    ///
    /// If the filter was already prepared its delay lines are re-sized,
    /// which allocates. Don't call this from `process()`.
    pub fn set_delay_time(&mut self, delay_ms: T) {
        self.delay_ms = delay_ms;
        self.update_delay_samples();
    }

    /// Change the sample rate the delay time is converted with.
    ///
    /// Same allocation caveat as [`set_delay_time`](Self::set_delay_time).
    pub fn set_sample_rate(&mut self, sample_rate: T) {
        self.sample_rate = sample_rate;
        self.update_delay_samples();
    }

    /// Derive the loop gain from a decay time in seconds (see the module
    /// docs), clamped to `±0.95`.
    ///
    /// Uses the current delay in samples, so call it after the delay time
    /// and sample rate are final.
    pub fn set_feedback(&mut self, decay_seconds: T) {
        nih_debug_assert!(
            decay_seconds > T::ZERO,
            "comb decay must be positive, got {:?}",
            decay_seconds
        );
        let decay_seconds = decay_seconds.max(T::from_f64(MIN_DECAY_SECONDS));

        let exponent = T::from_f64(-3.0) * self.delay_samples / (decay_seconds * self.sample_rate);
        let limit = T::from_f64(FEEDBACK_LIMIT);
        self.feedback = T::from_f64(10.0).powf(exponent).clamp(-limit, limit);
    }

    /// The current loop gain, before the phase sign is applied.
    pub fn feedback(&self) -> T {
        self.feedback
    }

    /// The loop delay in (fractional) samples at the current sample rate.
    pub fn delay_samples(&self) -> T {
        self.delay_samples
    }

    /// Set the sample rate and phase, then size and clear every channel's
    /// delay line.
    ///
    /// Each line holds one sample more than the loop delay so that both
    /// interpolation taps of a fractional delay stay inside the buffer.
    pub fn prepare(&mut self, sample_rate: T, flip_phase: bool) {
        self.sample_rate = sample_rate;
        self.delay_samples = ms_to_samples(self.delay_ms, sample_rate);
        self.phase_sign = if flip_phase { -T::ONE } else { T::ONE };
        self.prepared = true;
        self.resize_lines();
    }

    /// Clear the delay lines to silence. Does not allocate.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Run one sample of one channel through the filter.
    ///
    /// Channels beyond what the filter keeps state for pass through
    /// unchanged.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: T) -> T {
        let Some(line) = self.lines.get_mut(channel) else {
            return input;
        };

        let output = input + self.phase_sign * self.feedback * line.read(self.delay_samples);
        line.push(output);
        output
    }

    /// Filter a block of planar audio in place.
    pub fn process<C: AsMut<[T]>>(&mut self, channels: &mut [C]) {
        let num_channels = channels.len().min(FILTER_CHANNELS);
        for (channel, samples) in channels.iter_mut().take(num_channels).enumerate() {
            for sample in samples.as_mut() {
                *sample = self.process_sample(channel, *sample);
            }
        }
    }

    fn update_delay_samples(&mut self) {
        self.delay_samples = ms_to_samples(self.delay_ms, self.sample_rate);
        if self.prepared {
            self.resize_lines();
        }
    }

    fn resize_lines(&mut self) {
        nih_debug_assert!(self.delay_samples > T::ZERO);
        for line in &mut self.lines {
            line.resize(self.delay_samples + T::ONE);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
