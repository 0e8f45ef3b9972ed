//! Audio backend using Web Audio API
//!
//! Procedurally generated music and effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::AudioSink;
use crate::settings::Settings;

/// Running nodes of the background loop
struct MusicVoice {
    oscillators: Vec<OscillatorNode>,
    bus: GainNode,
}

impl MusicVoice {
    fn stop(self) {
        for osc in &self.oscillators {
            osc.stop().ok();
            osc.disconnect().ok();
        }
        self.bus.disconnect().ok();
    }
}

/// Browser audio for the game
pub struct WebAudio {
    ctx: Option<AudioContext>,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
    music: Option<MusicVoice>,
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut audio = Self {
            ctx,
            master_volume: 0.8,
            music_volume: 0.6,
            sfx_volume: 1.0,
            music: None,
        };
        audio.apply_settings(settings);
        audio
    }

    /// Pick up volume changes; takes effect on the next cue
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Engine drone plus a two-note bass riff, all driven by LFOs so the
    /// loop never needs rescheduling
    fn build_music(&self, ctx: &AudioContext, vol: f32) -> Option<MusicVoice> {
        let bus = ctx.create_gain().ok()?;
        bus.gain().set_value(vol);
        bus.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = ctx.current_time();
        let mut oscillators = Vec::new();

        // Engine: low sawtooth with a slow rev wobble
        let engine = ctx.create_oscillator().ok()?;
        let engine_gain = ctx.create_gain().ok()?;
        engine.set_type(OscillatorType::Sawtooth);
        engine.frequency().set_value(55.0);
        engine_gain.gain().set_value(0.18);
        engine.connect_with_audio_node(&engine_gain).ok()?;
        engine_gain.connect_with_audio_node(&bus).ok()?;

        let rev_lfo = ctx.create_oscillator().ok()?;
        let rev_depth = ctx.create_gain().ok()?;
        rev_lfo.set_type(OscillatorType::Sine);
        rev_lfo.frequency().set_value(0.5);
        rev_depth.gain().set_value(8.0);
        rev_lfo.connect_with_audio_node(&rev_depth).ok()?;
        rev_depth.connect_with_audio_param(&engine.frequency()).ok()?;

        // Bass riff: square LFO flips the pitch between two notes
        let bass = ctx.create_oscillator().ok()?;
        let bass_gain = ctx.create_gain().ok()?;
        bass.set_type(OscillatorType::Triangle);
        bass.frequency().set_value(110.0);
        bass_gain.gain().set_value(0.25);
        bass.connect_with_audio_node(&bass_gain).ok()?;
        bass_gain.connect_with_audio_node(&bus).ok()?;

        let riff_lfo = ctx.create_oscillator().ok()?;
        let riff_depth = ctx.create_gain().ok()?;
        riff_lfo.set_type(OscillatorType::Square);
        riff_lfo.frequency().set_value(2.0);
        riff_depth.gain().set_value(27.5);
        riff_lfo.connect_with_audio_node(&riff_depth).ok()?;
        riff_depth.connect_with_audio_param(&bass.frequency()).ok()?;

        // Pulse: the riff LFO also ducks the bass for a driving beat
        let pulse_depth = ctx.create_gain().ok()?;
        pulse_depth.gain().set_value(0.1);
        riff_lfo.connect_with_audio_node(&pulse_depth).ok()?;
        pulse_depth.connect_with_audio_param(&bass_gain.gain()).ok()?;

        // Fade in so restarts don't click
        bus.gain().set_value_at_time(0.001, t).ok();
        bus.gain()
            .exponential_ramp_to_value_at_time(vol.max(0.001), t + 0.4)
            .ok();

        for osc in [engine, rev_lfo, bass, riff_lfo] {
            osc.start().ok();
            oscillators.push(osc);
        }

        Some(MusicVoice { oscillators, bus })
    }

    /// Crash - crunch, then a falling scrape
    fn play_crash_sound(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Impact body
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }

        // Crunching metal: jittery square
        if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            for (i, freq) in [900.0, 2400.0, 600.0, 1800.0, 400.0, 1200.0, 250.0]
                .iter()
                .enumerate()
            {
                osc.frequency()
                    .set_value_at_time(*freq, t + i as f64 * 0.03)
                    .ok();
            }
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        // Glass tinkle after the hit
        for (i, freq) in [2600.0, 3100.0, 2200.0].iter().enumerate() {
            let delay = 0.15 + i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let start = t + delay;
                gain.gain().set_value_at_time(vol * 0.12, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.25).ok();
            }
        }
    }
}

impl AudioSink for WebAudio {
    fn start_music(&mut self) {
        if let Some(voice) = self.music.take() {
            voice.stop();
        }
        let vol = self.master_volume * self.music_volume;
        let Some(ctx) = &self.ctx else { return };
        self.resume();
        self.music = self.build_music(ctx, vol);
        if self.music.is_none() {
            log::warn!("Could not build music graph");
        }
    }

    fn stop_music(&mut self) {
        // Rebuilt from scratch on the next start, so playback rewinds
        if let Some(voice) = self.music.take() {
            voice.stop();
        }
    }

    fn play_crash(&mut self) {
        let vol = self.master_volume * self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();
        self.play_crash_sound(ctx, vol);
    }
}
