//! # Schroeder Reverb
//!
//! The classic artificial reverb: four feedback combs in parallel build up
//! a dense tail, then two all-pass filters in series thicken it further
//! without adding resonances.
//!
//! ```text
//!         ┌──► [Comb 30.1 ms  (-)] ──┐
//!         ├──► [Comb 34.2 ms  (+)] ──┤
//! Input ──┼──► [Comb 39.1 ms  (-)] ──┼──► (+) × 1/4 ──► [AP 1.2 ms] ──► [AP 3.6 ms] ──► wet
//!   │     └──► [Comb 45.1 ms  (+)] ──┘
//!   │
//!   └───────────────────────────────────────────── dry
//!
//! Output = (1 - mix) * dry + mix * wet
//! ```
//!
//! The comb delays are close together but share no simple ratios, so
//! their echoes never line up into a periodic "flutter". Every other comb
//! has its feedback sign flipped, which decorrelates them further.
//!
//! A single *decay* control (seconds) sets the feedback of all four combs
//! through the RT60 relation in [`CombFilter::set_feedback`].

use super::allpass::AllPassFilter;
use super::comb::CombFilter;
use super::ramp::ParameterRamp;
use super::sample::Sample;
use super::FILTER_CHANNELS;

/// Comb loop delays in milliseconds.
pub const COMB_DELAYS_MS: [f64; 4] = [30.1, 34.2, 39.1, 45.1];
/// All-pass delays in milliseconds.
pub const ALLPASS_DELAYS_MS: [f64; 2] = [1.2, 3.6];
const ALLPASS_FEEDBACK: f64 = 0.5;

pub const DEFAULT_DECAY_SECONDS: f64 = 2.5;
pub const DEFAULT_MIX: f64 = 0.8;

const DECAY_RAMP_SECONDS: f64 = 0.001;
const MIX_RAMP_SECONDS: f64 = 0.05;

/// Four parallel combs, two series all-passes, and a dry/wet blend.
#[derive(Debug, Clone)]
pub struct Reverb<T: Sample> {
    sample_rate: T,
    combs: [CombFilter<T>; 4],
    allpasses: [AllPassFilter<T>; 2],
    mix: ParameterRamp<T>,
    decay: ParameterRamp<T>,
    /// Decay the comb feedbacks were last derived from.
    applied_decay: T,
}

impl<T: Sample> Default for Reverb<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> Reverb<T> {
    /// A reverb with the default delays, decay, and mix. The filters own
    /// no memory until [`prepare`](Self::prepare) is called.
    pub fn new() -> Self {
        Self {
            sample_rate: T::from_f64(44100.0),
            combs: COMB_DELAYS_MS.map(|ms| CombFilter::new(T::from_f64(ms))),
            allpasses: ALLPASS_DELAYS_MS.map(|ms| AllPassFilter::new(T::from_f64(ms))),
            mix: ParameterRamp::new(T::from_f64(DEFAULT_MIX)),
            decay: ParameterRamp::new(T::from_f64(DEFAULT_DECAY_SECONDS)),
            applied_decay: T::from_f64(DEFAULT_DECAY_SECONDS),
        }
    }

    /// Size and clear every filter for `sample_rate` and put both controls
    /// back at their defaults (decay 2.5 s, mix 0.8).
    ///
    /// Allocates. Call from `initialize()`.
    pub fn prepare(&mut self, sample_rate: T) {
        self.sample_rate = sample_rate;

        self.mix.reset(sample_rate, T::from_f64(MIX_RAMP_SECONDS));
        self.mix.set_current_and_target(T::from_f64(DEFAULT_MIX));

        let decay = T::from_f64(DEFAULT_DECAY_SECONDS);
        self.decay.reset(sample_rate, T::from_f64(DECAY_RAMP_SECONDS));
        self.decay.set_current_and_target(decay);
        self.applied_decay = decay;

        for (index, comb) in self.combs.iter_mut().enumerate() {
            comb.prepare(sample_rate, index % 2 == 0);
            comb.set_feedback(decay);
        }

        for allpass in &mut self.allpasses {
            allpass.set_feedback(T::from_f64(ALLPASS_FEEDBACK));
            allpass.prepare(sample_rate);
        }
    }

    /// Silence every filter's history without reallocating.
    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }

    /// Set the dry/wet balance, clamped to `[0, 1]`. Ramped over 50 ms.
    pub fn set_mix(&mut self, mix: T) {
        self.mix.set_target(mix.clamp(T::ZERO, T::ONE));
    }

    /// Set the decay time in seconds.
    ///
    /// This consumes one step of the decay ramp and re-derives every comb's
    /// feedback from it, so each call moves the combs one step closer to
    /// the new decay. Hosts push it once per block.
    pub fn set_decay(&mut self, decay_seconds: T) {
        self.decay.set_target(decay_seconds);

        let decay = self.decay.next();
        if decay == self.applied_decay {
            return;
        }

        self.applied_decay = decay;
        for comb in &mut self.combs {
            comb.set_feedback(decay);
        }
    }

    /// How long the tail rings after the input stops, in samples: the
    /// decay time plus one trip through the longest comb.
    pub fn tail_samples(&self) -> u32 {
        let longest_comb = self
            .combs
            .iter()
            .map(CombFilter::delay_samples)
            .fold(T::ZERO, T::max);
        let decay = self.applied_decay.max(T::ZERO);

        (decay * self.sample_rate + longest_comb).ceil().to_usize() as u32
    }

    /// Process a block of planar audio in place.
    ///
    /// Every comb sees the original input, never another comb's output.
    /// Channels past the second are left untouched.
    pub fn process<C: AsMut<[T]>>(&mut self, channels: &mut [C]) {
        let num_channels = channels.len().min(FILTER_CHANNELS);
        let num_samples = channels
            .iter_mut()
            .take(num_channels)
            .map(|c| c.as_mut().len())
            .min()
            .unwrap_or(0);
        let comb_gain = T::ONE / T::from_usize(self.combs.len());

        // ─── THE REVERB ALGORITHM (per sample frame) ───
        //
        // 1. Advance the mix ramp once for the whole frame
        // 2. Feed the dry sample to all four combs in parallel
        // 3. Average the comb outputs
        // 4. Diffuse through the all-passes, shortest first
        // 5. Blend dry and wet
        for i in 0..num_samples {
            // Step 1: one mix step per frame, shared by all channels.
            let mix = self.mix.next();

            for (channel, samples) in channels.iter_mut().take(num_channels).enumerate() {
                let sample = &mut samples.as_mut()[i];
                let dry = *sample;

                // Step 2: each comb sees the dry input, not its
                // neighbour's output.
                let mut wet = T::ZERO;
                for comb in &mut self.combs {
                    wet += comb.process_sample(channel, dry);
                }

                // Step 3: four combs summed would be up to 4x louder.
                wet *= comb_gain;

                // Step 4: series all-passes. Each one's output is the
                // next one's input.
                for allpass in &mut self.allpasses {
                    wet = allpass.process_sample(channel, wet);
                }

                // Step 5
                *sample = (T::ONE - mix) * dry + mix * wet;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
