//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no asset files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    CoinPickup,
    /// Car hit an obstacle
    Crash,
    /// Score crossed an interval
    Milestone,
    /// Session started
    Start,
    /// Result made the leaderboard
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Pick up volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::CoinPickup => self.play_coin(ctx, vol),
            SoundEffect::Crash => self.play_crash(ctx, vol),
            SoundEffect::Milestone => self.play_milestone(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Oscillator routed through a gain node to the output
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

    /// Short rising arpeggio
    fn play_notes(&self, ctx: &AudioContext, vol: f32, notes: &[f32], step: f64, decay: f64) {
        for (i, freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * step;
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + decay)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + decay + 0.05).ok();
        }
    }

    /// Coin - two quick bright pings
    fn play_coin(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [988.0, 1319.0].iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + i as f64 * 0.06;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    /// Crash - low rumble with a metallic crack
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(1400.0, t).ok();
            osc.frequency().set_value_at_time(600.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(1100.0, t + 0.06).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    fn play_milestone(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol, &[523.0, 659.0, 784.0], 0.07, 0.2);
    }

    /// Start - engine rev sweep
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(80.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(320.0, t + 0.45)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.65).ok();
    }

    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.25);
    }
}
