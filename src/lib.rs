//! # Loveless Reverb & Chorus: Two AU/VST3/CLAP Effects
//!
//! Two classic time-based effects built with
//! [nih-plug](https://github.com/robbert-vdh/nih-plug) for learning DSP,
//! exported from a single library in Audio Unit (AUv2), VST3, and CLAP
//! formats. Both are built from the same primitive, a fractional delay
//! line, and every algorithm is implemented from scratch.
//!
//! ## Loveless Reverb
//!
//! A Schroeder reverberator: four feedback combs in parallel, averaged,
//! then two all-pass filters in series.
//!
//! ```text
//!         ┌──► [Comb] ──┐
//!         ├──► [Comb] ──┤
//! Input ──┼──► [Comb] ──┼──► (+) / 4 ──► [All-Pass] ──► [All-Pass] ── × mix ──┐
//!   │     └──► [Comb] ──┘                                                    │
//!   └─────────────────────────────────────────────────── × (1 - mix) ──────►(+)──► Output
//! ```
//!
//! ## Loveless Chorus
//!
//! One LFO-swept delay per channel, blended with the dry signal.
//!
//! ```text
//! Input ──┬──► [Delay Line, read at base + sin(LFO) × depth] ── × mix ──┐
//!         └──────────────────────────────────────────── × (1 - mix) ──►(+)──► Output
//! ```
//!
//! The DSP core in [`dsp`] knows nothing about plugin hosts; the plugin
//! structs only translate the host's lifecycle into `prepare()`,
//! `reset()`, and `process()` calls.

pub mod dsp;
mod params;

mod chorus_plugin;
mod reverb_plugin;

use nih_plug::prelude::*;

pub use chorus_plugin::LovelessChorus;
pub use reverb_plugin::LovelessReverb;

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// These generate the C-compatible entry points the host uses to discover
// the plugins. Both plugins share one library, so both macros list both.
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.

nih_export_clap!(LovelessReverb, LovelessChorus);
nih_export_vst3!(LovelessReverb, LovelessChorus);

// Re-export the CLAP entry point as an AUv2 factory for Logic Pro.
clap_wrapper::export_auv2!();
