//! # Schroeder All-Pass Filter
//!
//! ```text
//! y[n] = -g * x[n] + x[n - D] + g * y[n - D]
//! ```
//!
//! The feedforward and feedback paths cancel each other's effect on
//! *loudness*: every frequency comes out at exactly the level it went in.
//! What changes is *timing*. Each frequency is delayed by a different
//! amount, which smears a sharp transient into a dense cloud of echoes.
//!
//! That's exactly what a reverb tail needs after the comb bank: more echo
//! density, but no extra resonant peaks ("metallic ringing").
//!
//! The filter needs both the input history `x[n - D]` and the output
//! history `y[n - D]`, so each channel owns two delay lines: a *dry* one
//! for inputs and a *wet* one for outputs.

use nih_plug::nih_debug_assert;

use super::delay_line::DelayLine;
use super::sample::{ms_to_samples, Sample};
use super::FILTER_CHANNELS;

/// Feedback is kept inside `[MIN_FEEDBACK, MAX_FEEDBACK]`. Near zero the
/// filter degenerates into a plain delay; near one it rings forever.
const MIN_FEEDBACK: f64 = 0.3;
const MAX_FEEDBACK: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct AllPassFilter<T: Sample> {
    delay_ms: T,
    delay_samples: T,
    sample_rate: T,
    feedback: T,
    prepared: bool,
    /// Per-channel input history.
    dry_lines: [DelayLine<T>; FILTER_CHANNELS],
    /// Per-channel output history.
    wet_lines: [DelayLine<T>; FILTER_CHANNELS],
}

impl<T: Sample> AllPassFilter<T> {
    /// An all-pass with the given delay and a coefficient of 0.5. Nothing
    /// is allocated until [`prepare`](Self::prepare).
    pub fn new(delay_ms: T) -> Self {
        let sample_rate = T::from_f64(44100.0);
        Self {
            delay_ms,
            delay_samples: ms_to_samples(delay_ms, sample_rate),
            sample_rate,
            feedback: T::from_f64(0.5),
            prepared: false,
            dry_lines: Default::default(),
            wet_lines: Default::default(),
        }
    }

    /// Change the delay. Re-sizes (allocates) if already prepared.
    pub fn set_delay_time(&mut self, delay_ms: T) {
        self.delay_ms = delay_ms;
        self.update_delay_samples();
    }

    /// Change the sample rate. Re-sizes (allocates) if already prepared.
    pub fn set_sample_rate(&mut self, sample_rate: T) {
        self.sample_rate = sample_rate;
        self.update_delay_samples();
    }

    /// Set the all-pass coefficient, clamped to `[0.3, 0.9]`.
    pub fn set_feedback(&mut self, feedback: T) {
        self.feedback = feedback.clamp(T::from_f64(MIN_FEEDBACK), T::from_f64(MAX_FEEDBACK));
    }

    /// The all-pass coefficient `g`.
    pub fn feedback(&self) -> T {
        self.feedback
    }

    /// The delay in (fractional) samples at the current sample rate.
    pub fn delay_samples(&self) -> T {
        self.delay_samples
    }

    /// Size and clear both delay lines of every channel for `sample_rate`.
    pub fn prepare(&mut self, sample_rate: T) {
        self.sample_rate = sample_rate;
        self.delay_samples = ms_to_samples(self.delay_ms, sample_rate);
        self.prepared = true;
        self.resize_lines();
    }

    /// Clear the input and output history to silence. Does not allocate.
    pub fn reset(&mut self) {
        for line in self.dry_lines.iter_mut().chain(self.wet_lines.iter_mut()) {
            line.clear();
        }
    }

    /// Run one sample of one channel through the filter. Channels without
    /// state pass through unchanged.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: T) -> T {
        let (Some(dry), Some(wet)) = (
            self.dry_lines.get_mut(channel),
            self.wet_lines.get_mut(channel),
        ) else {
            return input;
        };

        // Both taps are read before this sample is pushed, so they hold
        // x[n - D] and y[n - D].
        let g = self.feedback;
        let output =
            -g * input + dry.read(self.delay_samples) + g * wet.read(self.delay_samples);

        dry.push(input);
        wet.push(output);
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
        // One extra slot keeps the upper interpolation tap in range.
        for line in self.dry_lines.iter_mut().chain(self.wet_lines.iter_mut()) {
            line.resize(self.delay_samples + T::ONE);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    /// Drive the filter with a sine until the start-up transient has died
    /// away, then compare output and input RMS over a whole number of
    /// periods. An all-pass leaves the level untouched at every frequency
    /// and for every allowed feedback value.
    #[test]
    fn test_unity_gain_for_steady_sinusoids() {
        const SAMPLE_RATE: f64 = 48000.0;
        const WARMUP: usize = 24000;
        const WINDOW: usize = 4800;

        for feedback in [0.3, 0.5, 0.9] {
            for freq in [100.0, 1000.0, 5000.0] {
                // 1 ms is exactly 48 samples, so every read is an exact tap.
                let mut ap = AllPassFilter::<f64>::new(1.0);
                ap.prepare(SAMPLE_RATE);
                ap.set_feedback(feedback);

                let input: Vec<f64> = (0..WARMUP + WINDOW)
                    .map(|n| (std::f64::consts::TAU * freq * n as f64 / SAMPLE_RATE).sin())
                    .collect();
                let output: Vec<f64> = input.iter().map(|&x| ap.process_sample(0, x)).collect();

                let gain = rms(&output[WARMUP..]) / rms(&input[WARMUP..]);
                assert!(
                    (gain - 1.0).abs() < 1e-3,
                    "gain {gain} at {freq} Hz with feedback {feedback}"
                );
            }
        }
    }

    #[test]
    fn test_feedback_is_clamped() {
        let mut ap = AllPassFilter::<f32>::new(1.2);

        ap.set_feedback(0.0);
        assert!((ap.feedback() - 0.3).abs() < 1e-6);

        ap.set_feedback(1.5);
        assert!((ap.feedback() - 0.9).abs() < 1e-6);

        ap.set_feedback(0.5);
        assert!((ap.feedback() - 0.5).abs() < 1e-6);
    }

    /// First output is `-g * x`, the delayed path arrives `D + 1` samples
    /// later as `1 - g^2`.
    #[test]
    fn test_impulse_response_head() {
        let mut ap = AllPassFilter::<f64>::new(2.0);
        ap.prepare(1000.0);
        ap.set_feedback(0.5);

        let mut block = vec![0.0_f64; 6];
        block[0] = 1.0;
        let mut channels = [block];
        ap.process(&mut channels);
        let out = &channels[0];

        assert!((out[0] + 0.5).abs() < 1e-12);
        assert_eq!(out[1], 0.0);
        assert_eq!(out[2], 0.0);
        assert!((out[3] - 0.75).abs() < 1e-12, "got {}", out[3]);
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut ap = AllPassFilter::<f32>::new(3.6);
        ap.prepare(44100.0);

        for _ in 0..1000 {
            assert_eq!(ap.process_sample(1, 0.0), 0.0);
        }
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ap = AllPassFilter::<f32>::new(2.0);
        ap.prepare(1000.0);

        ap.process_sample(0, 1.0);
        ap.reset();
        for _ in 0..10 {
            assert_eq!(ap.process_sample(0, 0.0), 0.0);
        }
    }
}
