//! # Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. Every effect in this crate is built on it: the
//! reverb's comb and all-pass filters use one (or two) per channel, and the
//! chorus uses one per channel with a continuously moving read position.
//!
//! ## Writing Backward
//!
//! Most ring buffers move the write head forward and read "behind" it.
//! This one moves the write head *backward*: [`push`](DelayLine::push)
//! stores the sample at the cursor, then steps the cursor down by one
//! (wrapping from 0 to `capacity - 1`).
//!
//! The payoff is in the read arithmetic. The most recent sample always
//! sits one slot *above* the cursor, the one before it two slots above,
//! and so on:
//!
//! ```text
//! index_of(delay) = (cursor + 1 + delay) % capacity
//! ```
//!
//! Both taps of an interpolated read use that same expression (with
//! `delay` and `delay + 1`), so there are no separate wrap-around
//! branches for "before" and "after" the write head.
//!
//! ## Linear Interpolation
//!
//! When the delay isn't a whole number of samples (the chorus sweeps it
//! continuously), [`read`](DelayLine::read) blends the two neighbors:
//!
//! ```text
//! result = s0 + frac * (s1 - s0)
//! ```
//!
//! For a whole-number delay `frac` is exactly zero, so `read(d)` returns
//! bit-for-bit the same value as `get(d)`.

use super::sample::Sample;

/// A fixed-capacity ring buffer of past samples.
///
/// The buffer is only ever allocated by [`new`](Self::new) and
/// [`resize`](Self::resize), which belong in `initialize()`. Pushing and
/// reading never allocate.
#[derive(Debug, Clone)]
pub struct DelayLine<T: Sample> {
    /// The stored samples. All values start at zero (silence).
    buffer: Vec<T>,

    /// The slot the next [`push`](Self::push) will overwrite. Always
    /// holds the *oldest* sample in the buffer.
    cursor: usize,
}

impl<T: Sample> Default for DelayLine<T> {
    /// A one-sample line, so that an effect that was never prepared still
    /// has valid (if useless) ring buffer arithmetic.
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T: Sample> DelayLine<T> {
    /// Create a delay line holding the `capacity` most recent samples.
    ///
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::ZERO; capacity.max(1)],
            cursor: 0,
        }
    }

    /// Reallocate to hold `ceil(capacity_samples)` samples, zero-filled,
    /// with the cursor back at the start.
    ///
    /// This allocates, so call it from `initialize()`, never from
    /// `process()`.
    pub fn resize(&mut self, capacity_samples: T) {
        let capacity = capacity_samples.ceil().to_usize().max(1);
        self.buffer.clear();
        self.buffer.resize(capacity, T::ZERO);
        self.cursor = 0;
    }

    /// Clear the entire buffer to silence and reset the cursor.
    /// Capacity is unchanged.
    pub fn clear(&mut self) {
        self.buffer.fill(T::ZERO);
        self.cursor = 0;
    }

    /// Number of samples the line remembers.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Store `sample` as the newest entry, then step the cursor backward.
    #[inline]
    pub fn push(&mut self, sample: T) {
        self.buffer[self.cursor] = sample;
        self.cursor = if self.cursor == 0 {
            self.buffer.len() - 1
        } else {
            self.cursor - 1
        };
    }

    /// The sample pushed exactly `delay_samples` pushes ago.
    ///
    /// `get(0)` is the most recent sample. Before the line has been filled,
    /// delays that reach past what was pushed return the zero it was
    /// cleared to.
    ///
    /// `delay_samples` must be below [`capacity`](Self::capacity). This is
    /// checked in debug builds only.
    #[inline]
    pub fn get(&self, delay_samples: usize) -> T {
        let capacity = self.buffer.len();
        debug_assert!(
            delay_samples < capacity,
            "delay of {delay_samples} samples does not fit a line of capacity {capacity}"
        );

        self.buffer[(self.cursor + 1 + delay_samples) % capacity]
    }

    /// A delayed sample at a fractional position, linearly interpolated
    /// between the two neighboring stored samples.
    ///
    /// `delay_samples` must lie in `0..=capacity - 1`. This is checked in
    /// debug builds only; callers that sweep the delay clamp it first.
    #[inline]
    pub fn read(&self, delay_samples: T) -> T {
        let capacity = self.buffer.len();
        debug_assert!(
            delay_samples >= T::ZERO && delay_samples <= T::from_usize(capacity - 1),
            "fractional delay {delay_samples:?} outside 0..={} samples",
            capacity - 1
        );

        // Split 441.3 into index 441 and blend amount 0.3.
        let i0 = delay_samples.floor().to_usize();
        let frac = delay_samples - T::from_usize(i0);
        let i1 = (i0 + 1) % capacity;

        let s0 = self.buffer[(self.cursor + 1 + i0) % capacity];
        let s1 = self.buffer[(self.cursor + 1 + i1) % capacity];

        s0 + frac * (s1 - s0)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
