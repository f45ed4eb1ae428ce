//! # Parameter Ramp (Linear Smoothing)
//!
//! When a knob moves, its value jumps. Applied directly to a gain or a
//! delay time, that jump is an audible click ("zipper noise"). A ramp
//! spreads the change over a fixed number of samples instead:
//!
//! ```text
//! target ─────────────────────┐            ┌──────────
//!                             │         ╱
//!                             │      ╱
//!                             │   ╱
//! current ────────────────────┘╱
//!                              |<- ramp ->|
//! ```
//!
//! ## One Read Per Sample
//!
//! [`next`](ParameterRamp::next) is the *only* way to get a value out of a
//! ramp, and every call advances it by one sample. There is deliberately
//! no "peek". An algorithm must call `next()` exactly once for every
//! output sample it produces, otherwise the ramp runs faster or slower
//! than real time.

use super::sample::Sample;

/// A value that moves linearly from its current position to a target over
/// a fixed number of samples.
#[derive(Debug, Clone)]
pub struct ParameterRamp<T: Sample> {
    current: T,
    target: T,
    /// Amount added to `current` on every step while ramping.
    step: T,
    /// Steps left until `current` lands on `target`.
    remaining: usize,
    /// Length of a full ramp, set by [`reset`](Self::reset).
    ramp_steps: usize,
}

impl<T: Sample> ParameterRamp<T> {
    /// A ramp resting at `initial`. Until [`reset`](Self::reset) gives it a
    /// duration, target changes apply instantly.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            target: initial,
            step: T::ZERO,
            remaining: 0,
            ramp_steps: 0,
        }
    }

    /// Set the ramp length to `floor(ramp_seconds * sample_rate)` samples
    /// and snap the current value onto the target.
    pub fn reset(&mut self, sample_rate: T, ramp_seconds: T) {
        self.ramp_steps = (ramp_seconds * sample_rate).floor().to_usize();
        self.set_current_and_target(self.target);
    }

    /// Jump straight to `value` with no ramp.
    pub fn set_current_and_target(&mut self, value: T) {
        self.current = value;
        self.target = value;
        self.step = T::ZERO;
        self.remaining = 0;
    }

    /// Start ramping from wherever the value is now toward `value`.
    ///
    /// Setting the same target again is a no-op, so hosts can push a
    /// parameter every block without restarting the ramp.
    pub fn set_target(&mut self, value: T) {
        if value == self.target {
            return;
        }

        if self.ramp_steps == 0 {
            self.set_current_and_target(value);
            return;
        }

        self.target = value;
        self.remaining = self.ramp_steps;
        self.step = (self.target - self.current) / T::from_usize(self.ramp_steps);
    }

    /// The value the ramp is heading toward.
    pub fn target(&self) -> T {
        self.target
    }

    /// Whether the ramp still has steps left before reaching its target.
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }

    /// Advance one sample and return the new value.
    ///
    /// The final step lands exactly on the target (no accumulated float
    /// error), and every call after that returns the target unchanged.
    #[inline]
    pub fn next(&mut self) -> T {
        if self.remaining == 0 {
            return self.target;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            self.current = self.target;
        } else {
            self.current += self.step;
        }

        self.current
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// 0.5 s at 1 kHz is 500 steps. The 500th lands exactly on target.
    #[test]
    fn test_converges_after_ramp_length() {
        let mut ramp = ParameterRamp::<f32>::new(0.0);
        ramp.reset(1000.0, 0.5);
        ramp.set_target(0.8);

        let mut last = 0.0;
        for step in 0..500 {
            let v = ramp.next();
            assert!(v >= last, "ramp went backward at step {step}: {v} < {last}");
            last = v;
        }

        assert_eq!(last, 0.8);
        assert!(!ramp.is_ramping());
        for _ in 0..100 {
            assert_eq!(ramp.next(), 0.8);
        }
    }

    #[test]
    fn test_intermediate_values_are_linear() {
        let mut ramp = ParameterRamp::<f64>::new(1.0);
        ramp.reset(100.0, 0.1);
        ramp.set_target(0.0);

        // 10 steps of -0.1 each.
        assert!((ramp.next() - 0.9).abs() < 1e-12);
        assert!((ramp.next() - 0.8).abs() < 1e-12);
        for _ in 0..7 {
            ramp.next();
        }
        assert_eq!(ramp.next(), 0.0);
    }

    #[test]
    fn test_zero_length_ramp_jumps() {
        let mut ramp = ParameterRamp::<f32>::new(0.0);
        ramp.set_target(0.5);
        assert_eq!(ramp.next(), 0.5);

        ramp.reset(44100.0, 0.0);
        ramp.set_target(0.25);
        assert_eq!(ramp.next(), 0.25);
    }

    /// Pushing the same target every block must not restart the ramp.
    #[test]
    fn test_repeated_target_does_not_restart() {
        let mut ramp = ParameterRamp::<f32>::new(0.0);
        ramp.reset(80.0, 0.125);
        ramp.set_target(1.0);

        for _ in 0..5 {
            ramp.next();
        }
        ramp.set_target(1.0);
        for _ in 0..5 {
            ramp.next();
        }

        assert!(!ramp.is_ramping());
        assert_eq!(ramp.next(), 1.0);
    }

    #[test]
    fn test_reset_snaps_to_target() {
        let mut ramp = ParameterRamp::<f32>::new(0.0);
        ramp.reset(1000.0, 1.0);
        ramp.set_target(1.0);
        ramp.next();

        ramp.reset(1000.0, 1.0);
        assert!(!ramp.is_ramping());
        assert_eq!(ramp.next(), 1.0);
    }

    /// Retargeting mid-ramp starts from the current position.
    #[test]
    fn test_retarget_mid_ramp() {
        let mut ramp = ParameterRamp::<f64>::new(0.0);
        ramp.reset(10.0, 1.0);
        ramp.set_target(1.0);
        for _ in 0..5 {
            ramp.next();
        }

        ramp.set_target(0.0);
        let v = ramp.next();
        assert!((v - 0.45).abs() < 1e-12, "expected 0.45, got {v}");
        assert_eq!(ramp.target(), 0.0);
    }
}
