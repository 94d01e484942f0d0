//! Cue player using the Web Audio API
//!
//! Every cue is synthesized from oscillators, no sound files to fetch.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::Cue;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
    /// Window lost focus with `mute_on_blur` set
    blurred: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: settings.clone(),
            blurred: false,
        }
    }

    /// Pick up changed volume or mute settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    /// Window focus changed
    pub fn set_focused(&mut self, focused: bool) {
        self.blurred = !focused && self.settings.mute_on_blur;
    }

    fn volume_for(&self, cue: Cue) -> f32 {
        if self.blurred {
            0.0
        } else {
            self.settings.effective_volume(cue.volume())
        }
    }

    /// Fire and forget a cue
    pub fn play(&self, cue: Cue) {
        let vol = self.volume_for(cue);
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Footstep => self.play_footstep(ctx, vol),
            Cue::Alert => self.play_alert(ctx, vol),
            Cue::Hack => self.play_hack(ctx, vol),
            Cue::Codec => self.play_codec(ctx, vol),
        }
    }

    /// Oscillator routed through a gain node to the speakers
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

    /// Footstep - short muffled thud
    fn play_footstep(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Alert - the "!" stinger, two sharp rising square blasts
    fn play_alert(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Hack - fast data chirps climbing up
    fn play_hack(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 900.0, 750.0, 1200.0, 1500.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.06).ok();
            }
        }
    }

    /// Codec - the two-tone ring
    fn play_codec(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [1400.0, 1050.0, 1400.0, 1050.0].iter().enumerate() {
            let start = t + i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol, start).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(0.0, start + 0.065)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.07).ok();
            }
        }
    }
}
