//! # Plugin Parameters
//!
//! Parameters are the knobs and sliders the user sees in the DAW. Each
//! parameter has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to
//!   save and recall presets. Once published, never change these IDs
//!   or existing presets will break.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range** (min, max, and optional skew).
//! - A **default value**.
//!
//! ## No Host-Side Smoothing
//!
//! Unlike a typical nih-plug plugin, none of these parameters have a
//! smoother attached. The reverb and chorus ramp every control
//! themselves (see `dsp::ramp`), so `process()` reads the plain
//! `.value()` once per block and hands it to the DSP core. Smoothing
//! twice would just make the knobs feel sluggish.

use nih_plug::prelude::*;

/// Parameters for the Loveless Reverb plugin.
#[derive(Params)]
pub struct ReverbParams {
    /// **Decay**: how long the tail rings, in seconds (RT60: the time
    /// for the reverb to fall by 60 dB).
    ///
    /// - 0.3 s = small, tight room
    /// - 2.5 s = the default, a large hall
    /// - 10 s = cavernous
    ///
    /// Skewed so the musically busy short end gets more knob travel.
    #[id = "decay"]
    pub decay: FloatParam,

    /// **Mix**: the balance between dry (original) and wet (reverberated)
    /// signal.
    #[id = "mix"]
    pub mix: FloatParam,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            decay: FloatParam::new(
                "Decay",
                2.5,
                FloatRange::Skewed {
                    min: 0.1,
                    max: 10.0,
                    factor: FloatRange::skew_factor(-1.0),
                },
            )
            .with_unit(" s")
            .with_step_size(0.01),

            mix: FloatParam::new("Mix", 0.8, FloatRange::Linear { min: 0.0, max: 1.0 })
                .with_unit("%")
                .with_value_to_string(formatters::v2s_f32_percentage(1))
                .with_string_to_value(formatters::s2v_f32_percentage()),
        }
    }
}

/// Parameters for the Loveless Chorus plugin.
///
/// Times are shown in milliseconds because that's how people talk about
/// chorus settings. The plugin converts them to seconds before handing
/// them to the DSP core.
#[derive(Params)]
pub struct ChorusParams {
    /// **Rate**: how fast the delay time wobbles, in Hz.
    ///
    /// Slow rates (0.1–0.5 Hz) give a gentle shimmer; fast rates
    /// (3–5 Hz) turn into vibrato.
    #[id = "rate"]
    pub rate: FloatParam,

    /// **Depth**: how far the delay swings either side of its base
    /// value. More depth means more pitch wobble.
    #[id = "depth"]
    pub depth: FloatParam,

    /// **Delay Left / Right**: the center delay of each channel. Unequal
    /// values spread the chorus across the stereo field.
    #[id = "dly_l"]
    pub delay_left: FloatParam,

    #[id = "dly_r"]
    pub delay_right: FloatParam,

    /// **Mix**: dry/wet balance. 50% gives the classic doubled sound.
    #[id = "mix"]
    pub mix: FloatParam,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            rate: FloatParam::new(
                "Rate",
                0.25,
                FloatRange::Skewed {
                    min: 0.01,
                    max: 5.0,
                    // LFO speed is perceived roughly logarithmically.
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_unit(" Hz")
            .with_step_size(0.005),

            depth: FloatParam::new("Depth", 5.0, FloatRange::Linear { min: 0.0, max: 10.0 })
                .with_unit(" ms")
                .with_step_size(0.05),

            delay_left: delay_param("Delay Left", 10.0),
            delay_right: delay_param("Delay Right", 30.0),

            mix: FloatParam::new("Mix", 0.5, FloatRange::Linear { min: 0.0, max: 1.0 })
                .with_unit("%")
                .with_value_to_string(formatters::v2s_f32_percentage(1))
                .with_string_to_value(formatters::s2v_f32_percentage()),
        }
    }
}

/// A per-channel base delay, 5–50 ms.
fn delay_param(name: &'static str, default_ms: f32) -> FloatParam {
    FloatParam::new(name, default_ms, FloatRange::Linear { min: 5.0, max: 50.0 })
        .with_unit(" ms")
        .with_step_size(0.1)
}
