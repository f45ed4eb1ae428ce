//! The Loveless Chorus plugin: host glue around [`Chorus`].

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::chorus::Chorus;
use crate::params::ChorusParams;

/// The chorus handles at most this many channels. Anything wider is passed
/// through dry.
const MAX_CHANNELS: usize = 2;

pub struct LovelessChorus {
    params: Arc<ChorusParams>,
    chorus: Chorus<f32, MAX_CHANNELS>,
}

impl Default for LovelessChorus {
    fn default() -> Self {
        Self {
            params: Arc::new(ChorusParams::default()),
            chorus: Chorus::new(),
        }
    }
}

impl LovelessChorus {
    /// Hand the current knob positions to the chorus. The UI shows
    /// milliseconds; the DSP core works in seconds.
    fn push_params(&mut self) {
        let params = &self.params;
        self.chorus.set_lfo_rate(params.rate.value());
        self.chorus.set_lfo_depth(params.depth.value() / 1000.0);
        self.chorus.set_delay_time(0, params.delay_left.value() / 1000.0);
        self.chorus.set_delay_time(1, params.delay_right.value() / 1000.0);
        self.chorus.set_mix(params.mix.value());
    }
}

impl Plugin for LovelessChorus {
    const NAME: &'static str = "Loveless Chorus";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(MAX_CHANNELS);
        nih_log!(
            "Initializing {} at {} Hz, {} channel(s)",
            Self::NAME,
            buffer_config.sample_rate,
            num_channels
        );

        // Push the restored knob positions first so prepare() snaps the
        // ramps straight to them instead of sweeping from the defaults.
        self.push_params();
        self.chorus.prepare(buffer_config.sample_rate);

        true
    }

    fn reset(&mut self) {
        self.chorus.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.push_params();
        self.chorus.process(buffer.as_slice());

        ProcessStatus::Tail(self.chorus.tail_samples())
    }
}

impl ClapPlugin for LovelessChorus {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-chorus";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A stereo chorus with independent left/right delay times");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Chorus,
    ];
}

impl Vst3Plugin for LovelessChorus {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssChorus_v001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}
