//! # Stereo Chorus
//!
//! Chorus thickens a sound by mixing it with a copy of itself whose delay
//! time slowly wobbles. A moving delay is a moving read head, and a moving
//! read head shifts pitch (like a tape speeding up and slowing down), so
//! the copy drifts slightly sharp and flat around the original. Two
//! voices that are almost, but not quite, in tune: a chorus.
//!
//! ```text
//!               ┌─── sin(2π · phase) × depth ───┐
//!               │                               ▼
//! Input ──┬──► [Delay Line] ◄── read at (base delay + LFO)
//!         │          │
//!         │          └──────────── × mix ──────────────┐
//!         └─────────────────────── × (1 - mix) ──────►(+)──► Output
//! ```
//!
//! Each channel has its own delay line, its own base delay, and its own
//! LFO phase, so setting different left/right delays widens the image.
//! Rate, depth, and mix are shared.
//!
//! Every control is ramped. Delay times ramp over 100 ms (a jump in delay
//! time is a jump in read position, which clicks); rate, depth, and mix
//! ramp over 50 ms.
//!
//! There is no feedback path: the chorus is strictly feedforward.

use nih_plug::{nih_debug_assert, nih_debug_assert_failure};

use super::delay_line::DelayLine;
use super::ramp::ParameterRamp;
use super::sample::Sample;

pub const DEFAULT_DELAY_SECONDS: [f64; 2] = [0.01, 0.03];
/// Longest base delay (50 ms) plus deepest modulation (10 ms).
pub const DEFAULT_MAX_DELAY_SECONDS: f64 = 0.06;
pub const DEFAULT_LFO_RATE_HZ: f64 = 0.25;
pub const DEFAULT_LFO_DEPTH_SECONDS: f64 = 0.005;
pub const DEFAULT_MIX: f64 = 0.5;

/// Lowest LFO rate accepted; rate setters clamp to it.
const MIN_LFO_RATE_HZ: f64 = 1e-3;

const DELAY_RAMP_SECONDS: f64 = 0.1;
const CONTROL_RAMP_SECONDS: f64 = 0.05;

/// A modulated-delay chorus for up to `CHANNELS` channels.
#[derive(Debug, Clone)]
pub struct Chorus<T: Sample, const CHANNELS: usize = 2> {
    sample_rate: T,
    max_delay_seconds: T,
    delay_lines: [DelayLine<T>; CHANNELS],
    /// Base delay per channel, in seconds.
    delay_times: [ParameterRamp<T>; CHANNELS],
    /// LFO position per channel, in `[0, 1)`.
    lfo_phase: [T; CHANNELS],
    lfo_rate: ParameterRamp<T>,
    lfo_depth: ParameterRamp<T>,
    mix: ParameterRamp<T>,
}

impl<T: Sample, const CHANNELS: usize> Default for Chorus<T, CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample, const CHANNELS: usize> Chorus<T, CHANNELS> {
    /// A chorus with the default settings. Channel `n` starts at
    /// `DEFAULT_DELAY_SECONDS[n % 2]`.
    pub fn new() -> Self {
        Self {
            sample_rate: T::from_f64(44100.0),
            max_delay_seconds: T::from_f64(DEFAULT_MAX_DELAY_SECONDS),
            delay_lines: std::array::from_fn(|_| DelayLine::default()),
            delay_times: std::array::from_fn(|channel| {
                ParameterRamp::new(T::from_f64(DEFAULT_DELAY_SECONDS[channel % 2]))
            }),
            lfo_phase: [T::ZERO; CHANNELS],
            lfo_rate: ParameterRamp::new(T::from_f64(DEFAULT_LFO_RATE_HZ)),
            lfo_depth: ParameterRamp::new(T::from_f64(DEFAULT_LFO_DEPTH_SECONDS)),
            mix: ParameterRamp::new(T::from_f64(DEFAULT_MIX)),
        }
    }

    /// Set one channel's base delay in seconds.
    pub fn set_delay_time(&mut self, channel: usize, seconds: T) {
        let Some(delay_time) = self.delay_times.get_mut(channel) else {
            nih_debug_assert_failure!("chorus has no channel {}", channel);
            return;
        };
        nih_debug_assert!(seconds >= T::ZERO, "negative delay {:?}", seconds);

        delay_time.set_target(seconds.max(T::ZERO));
    }

    /// Set the longest delay the lines must hold (base delay plus depth).
    ///
    /// Re-sizes the delay lines, which allocates. Don't call this from
    /// `process()`.
    pub fn set_max_delay_time(&mut self, seconds: T) {
        nih_debug_assert!(seconds > T::ZERO, "max delay must be positive");
        self.max_delay_seconds = seconds;
        self.resize_delay_lines();
    }

    /// LFO speed in Hz.
    pub fn set_lfo_rate(&mut self, hz: T) {
        nih_debug_assert!(hz > T::ZERO, "LFO rate must be positive, got {:?}", hz);
        self.lfo_rate.set_target(hz.max(T::from_f64(MIN_LFO_RATE_HZ)));
    }

    /// How far the LFO swings the delay either side of the base delay, in
    /// seconds.
    pub fn set_lfo_depth(&mut self, seconds: T) {
        nih_debug_assert!(seconds >= T::ZERO, "negative LFO depth {:?}", seconds);
        self.lfo_depth.set_target(seconds.max(T::ZERO));
    }

    /// Dry/wet balance, clamped to `[0, 1]`.
    pub fn set_mix(&mut self, mix: T) {
        self.mix.set_target(mix.clamp(T::ZERO, T::ONE));
    }

    /// Reset ramps to their current targets, size the delay lines for
    /// `sample_rate`, and zero every LFO phase.
    ///
    /// Allocates. Call from `initialize()`.
    pub fn prepare(&mut self, sample_rate: T) {
        self.sample_rate = sample_rate;

        for delay_time in &mut self.delay_times {
            delay_time.reset(sample_rate, T::from_f64(DELAY_RAMP_SECONDS));
        }
        let control_ramp = T::from_f64(CONTROL_RAMP_SECONDS);
        self.lfo_rate.reset(sample_rate, control_ramp);
        self.lfo_depth.reset(sample_rate, control_ramp);
        self.mix.reset(sample_rate, control_ramp);

        self.resize_delay_lines();
        self.lfo_phase = [T::ZERO; CHANNELS];
    }

    /// Clear the delay lines and restart the LFOs. Does not allocate.
    pub fn reset(&mut self) {
        for line in &mut self.delay_lines {
            line.clear();
        }
        self.lfo_phase = [T::ZERO; CHANNELS];
    }

    /// The longest echo the chorus can still emit after the input stops.
    pub fn tail_samples(&self) -> u32 {
        (self.max_delay_seconds * self.sample_rate).ceil().to_usize() as u32
    }

    /// Process a block of planar audio in place.
    ///
    /// Channels past `CHANNELS` are left untouched. Shared ramps advance
    /// once per sample frame; each channel's delay ramp advances once per
    /// sample of that channel.
    pub fn process<C: AsMut<[T]>>(&mut self, channels: &mut [C]) {
        let num_channels = channels.len().min(CHANNELS);
        let num_samples = channels
            .iter_mut()
            .take(num_channels)
            .map(|c| c.as_mut().len())
            .min()
            .unwrap_or(0);

        // ─── THE CHORUS ALGORITHM (per sample frame) ───
        //
        // 1. Advance the shared depth, mix, and rate ramps once
        // 2. Per channel, evaluate the LFO at its current phase
        // 3. Offset the ramped base delay by the LFO and convert to samples
        // 4. Write the input, then read back at the modulated delay
        // 5. Blend dry and wet
        // 6. Advance the channel's LFO phase, wrapping at 1
        for i in 0..num_samples {
            // Step 1
            let depth = self.lfo_depth.next();
            let mix = self.mix.next();
            let phase_increment = self.lfo_rate.next() / self.sample_rate;

            for (channel, samples) in channels.iter_mut().take(num_channels).enumerate() {
                let sample = &mut samples.as_mut()[i];
                let input = *sample;

                let line = &mut self.delay_lines[channel];
                let phase = &mut self.lfo_phase[channel];

                // Step 2: bipolar, in [-1, 1].
                let lfo = (*phase * T::TAU).sin();

                // Step 3: the LFO swings the read head `depth` seconds
                // either side of the base delay. Clamped so the read never
                // leaves the buffer, whatever the settings.
                let delay_seconds = self.delay_times[channel].next() + lfo * depth;
                let max_delay = T::from_usize(line.capacity() - 1);
                let delay_samples = (delay_seconds * self.sample_rate).clamp(T::ZERO, max_delay);

                // Step 4: push first, so a delay of 0 reads this input.
                line.push(input);
                let delayed = line.read(delay_samples);

                // Step 5
                *sample = input * (T::ONE - mix) + delayed * mix;

                // Step 6
                *phase += phase_increment;
                if *phase >= T::ONE {
                    *phase -= T::ONE;
                }
            }
        }
    }

    fn resize_delay_lines(&mut self) {
        let capacity = self.max_delay_seconds * self.sample_rate;
        for line in &mut self.delay_lines {
            line.resize(capacity);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_line_capacity_follows_sample_rate() {
        let mut chorus = Chorus::<f64>::new();
        chorus.prepare(48000.0);

        // ceil(0.06 * 48000) = 2880
        for line in &chorus.delay_lines {
            assert_eq!(line.capacity(), 2880);
        }
        assert_eq!(chorus.tail_samples(), 2880);
    }

    /// Mix 0 passes the input straight through.
    #[test]
    fn test_dry_mix_passes_input() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_mix(0.0);
        chorus.prepare(44100.0);

        let input: Vec<f32> = (0..512).map(|n| (n as f32 * 0.05).sin()).collect();
        let mut block = [input.clone(), input.clone()];
        chorus.process(&mut block);

        assert_eq!(block[0], input);
        assert_eq!(block[1], input);
    }

    /// With no modulation and a fully wet mix, the chorus is a plain delay
    /// of exactly `base delay * sample_rate` samples.
    #[test]
    fn test_wet_output_is_delayed_input() {
        let mut chorus = Chorus::<f64>::new();
        chorus.set_mix(1.0);
        chorus.set_lfo_depth(0.0);
        chorus.set_delay_time(0, 0.01);
        chorus.set_delay_time(1, 0.02);
        chorus.prepare(1000.0);

        let mut left = vec![0.0_f64; 40];
        let mut right = vec![0.0_f64; 40];
        left[0] = 1.0;
        right[0] = 1.0;
        let mut block = [left, right];
        chorus.process(&mut block);

        for n in 0..40 {
            let want_left = if n == 10 { 1.0 } else { 0.0 };
            let want_right = if n == 20 { 1.0 } else { 0.0 };
            assert!((block[0][n] - want_left).abs() < 1e-9, "left[{n}] = {}", block[0][n]);
            assert!((block[1][n] - want_right).abs() < 1e-9, "right[{n}] = {}", block[1][n]);
        }
    }

    /// The LFO phase repeats every `sample_rate / rate` samples.
    #[test]
    fn test_lfo_period() {
        const SAMPLE_RATE: f64 = 1000.0;
        const RATE: f64 = 10.0;
        let period = (SAMPLE_RATE / RATE) as usize;

        let mut chorus = Chorus::<f64>::new();
        chorus.set_lfo_rate(RATE);
        chorus.prepare(SAMPLE_RATE);

        let mut phases = Vec::new();
        for _ in 0..period * 4 {
            phases.push(chorus.lfo_phase[0]);
            let mut frame = [[0.25_f64], [0.25_f64]];
            chorus.process(&mut frame);
        }

        for n in 0..period * 3 {
            let d = (phases[n] - phases[n + period]).abs();
            let circular = d.min(1.0 - d);
            assert!(circular < 1e-9, "phase at {n} and {} differ by {d}", n + period);
        }

        let wraps = phases.windows(2).filter(|w| w[1] < w[0]).count();
        assert!((3..=4).contains(&wraps), "expected ~4 wraps, got {wraps}");
    }

    /// Linear interpolation is exact on a ramp, so with a ramp input the
    /// wet output is `n - delay_in_samples` and exposes the modulated delay
    /// directly: `base + sin(2π · phase) · depth`, periodic in
    /// `sample_rate / rate` samples.
    #[test]
    fn test_modulated_delay_follows_sine_lfo() {
        const SAMPLE_RATE: f64 = 1000.0;
        const RATE: f64 = 5.0;
        const DEPTH: f64 = 0.004;
        const BASE: f64 = 0.02;
        const LEN: usize = 1000;
        let period = (SAMPLE_RATE / RATE) as usize;

        let mut chorus = Chorus::<f64>::new();
        chorus.set_mix(1.0);
        chorus.set_lfo_rate(RATE);
        chorus.set_lfo_depth(DEPTH);
        chorus.set_delay_time(0, BASE);
        chorus.set_delay_time(1, BASE);
        chorus.prepare(SAMPLE_RATE);

        let ramp: Vec<f64> = (0..LEN).map(|n| n as f64).collect();
        let mut block = [ramp.clone(), ramp.clone()];
        chorus.process(&mut block);

        // Skip the first samples, where the read reaches into the
        // still-silent part of the line.
        let settled = 30;
        let mut phase = 0.0_f64;
        for n in 0..LEN {
            let delay = (BASE + (phase * std::f64::consts::TAU).sin() * DEPTH) * SAMPLE_RATE;
            if n >= settled {
                let expected = n as f64 - delay;
                for channel in 0..2 {
                    let got = block[channel][n];
                    assert!(
                        (got - expected).abs() < 1e-9,
                        "channel {channel} sample {n}: got {got}, expected {expected}"
                    );
                }
            }

            phase += RATE / SAMPLE_RATE;
            if phase >= 1.0 {
                phase -= 1.0;
            }
        }

        let offsets: Vec<f64> = (0..LEN).map(|n| n as f64 - block[0][n]).collect();
        for n in settled..LEN - period {
            assert!(
                (offsets[n] - offsets[n + period]).abs() < 1e-6,
                "offset at {n} and {} differ",
                n + period
            );
        }

        // The swing spans the full ±depth around the base delay.
        let lowest = offsets[settled..].iter().cloned().fold(f64::MAX, f64::min);
        let highest = offsets[settled..].iter().cloned().fold(f64::MIN, f64::max);
        assert!((lowest - 16.0).abs() < 1e-3, "lowest delay {lowest}");
        assert!((highest - 24.0).abs() < 1e-3, "highest delay {highest}");
    }

    #[test]
    fn test_phase_stays_in_unit_range() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_lfo_rate(5.0);
        chorus.prepare(44100.0);

        let mut block = [vec![0.1_f32; 1024], vec![0.1; 1024]];
        for _ in 0..50 {
            chorus.process(&mut block);
            for &phase in &chorus.lfo_phase {
                assert!((0.0..1.0).contains(&phase), "phase {phase} out of range");
            }
        }
    }

    /// Extreme settings are clamped into the delay line instead of reading
    /// outside it.
    #[test]
    fn test_extreme_modulation_stays_in_range() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_delay_time(0, 0.0);
        chorus.set_delay_time(1, 1.0);
        chorus.set_lfo_depth(0.5);
        chorus.set_lfo_rate(20.0);
        chorus.set_mix(1.0);
        chorus.prepare(44100.0);

        let mut block = [vec![0.5_f32; 4096], vec![0.5; 4096]];
        chorus.process(&mut block);
        assert!(block.iter().flatten().all(|s| s.is_finite() && s.abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn test_third_channel_untouched() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_mix(1.0);
        chorus.prepare(44100.0);

        let mut block = [vec![1.0_f32; 32], vec![1.0; 32], vec![1.0; 32]];
        chorus.process(&mut block);

        assert!(block[2].iter().all(|&s| s == 1.0));
        assert_eq!(block[0][0], 0.0, "wet-only output starts silent");
    }

    #[test]
    fn test_unknown_channel_is_ignored() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_delay_time(7, 0.02);
        assert_eq!(chorus.delay_times[0].target(), 0.01);
        assert_eq!(chorus.delay_times[1].target(), 0.03);
    }

    /// Shared ramps advance once per frame, not once per channel.
    #[test]
    fn test_shared_ramps_advance_once_per_frame() {
        let mut chorus = Chorus::<f64>::new();
        chorus.prepare(1000.0);
        chorus.set_mix(1.0);

        // 0.05 s at 1 kHz is 50 frames. Halfway through a stereo block of
        // 25 frames the ramp must still be moving.
        let mut block = [vec![0.0_f64; 25], vec![0.0; 25]];
        chorus.process(&mut block);
        assert!(chorus.mix.is_ramping());

        chorus.process(&mut block);
        assert!(!chorus.mix.is_ramping());
        assert_eq!(chorus.mix.next(), 1.0);
    }

    #[test]
    fn test_reset_clears_lines_and_phase() {
        let mut chorus = Chorus::<f32>::new();
        chorus.set_mix(1.0);
        chorus.prepare(44100.0);

        let mut block = [vec![1.0_f32; 2048], vec![1.0; 2048]];
        chorus.process(&mut block);
        chorus.reset();

        assert!(chorus.lfo_phase.iter().all(|&p| p == 0.0));
        let mut block = [vec![0.0_f32; 2048], vec![0.0; 2048]];
        chorus.process(&mut block);
        assert!(block.iter().flatten().all(|&s| s == 0.0));
    }
}
