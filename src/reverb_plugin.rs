//! The Loveless Reverb plugin: host glue around [`Reverb`].

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::reverb::Reverb;
use crate::params::ReverbParams;

/// The reverb plugin.
///
/// Parameters live behind an `Arc` so the host, the GUI, and the audio
/// thread can all read them. The reverb itself is owned exclusively by the
/// audio thread and only touched in `initialize()`, `reset()`, and
/// `process()`.
pub struct LovelessReverb {
    params: Arc<ReverbParams>,
    reverb: Reverb<f32>,
}

impl Default for LovelessReverb {
    fn default() -> Self {
        Self {
            params: Arc::new(ReverbParams::default()),
            reverb: Reverb::new(),
        }
    }
}

impl Plugin for LovelessReverb {
    const NAME: &'static str = "Loveless Reverb";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first (most DAW tracks), mono as a fallback.
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

    // Parameters are pushed into the reverb once per block and ramped per
    // sample inside it, so block-accurate automation is all we need.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Size every comb and all-pass delay line for the host's sample rate.
    /// This is the only place the reverb allocates.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get())
            .unwrap_or(2);
        nih_log!(
            "Initializing {} at {} Hz, {} channel(s), max block {}",
            Self::NAME,
            buffer_config.sample_rate,
            num_channels,
            buffer_config.max_buffer_size
        );

        self.reverb.prepare(buffer_config.sample_rate);

        true
    }

    /// Playback stopped: drop the tail so it doesn't bleed into the next
    /// play.
    fn reset(&mut self) {
        self.reverb.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.reverb.set_decay(self.params.decay.value());
        self.reverb.set_mix(self.params.mix.value());

        self.reverb.process(buffer.as_slice());

        // Keep the host calling us until the tail has decayed below -60 dB.
        ProcessStatus::Tail(self.reverb.tail_samples())
    }
}

impl ClapPlugin for LovelessReverb {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-reverb";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A Schroeder reverb with four combs and two all-pass filters");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for LovelessReverb {
    // `*b"..."` turns a 16-character ASCII literal into the `[u8; 16]`
    // class ID VST3 requires.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssReverb_v001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Reverb];
}
