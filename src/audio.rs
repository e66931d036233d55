//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round started
    Start,
    /// Layer kept; pitch climbs with the tower
    Place { score: u32 },
    /// Layer landed with nothing trimmed
    Perfect { score: u32 },
    /// Layer missed; round over
    Fall,
    /// Stack rebuilt
    Reset,
}

/// Base pitch of a placement chime
const PLACE_BASE_HZ: f32 = 220.0;
/// The chime climbs one semitone per layer, wrapping after two octaves
const PLACE_STEPS: u32 = 24;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::Place { score } => self.play_place(ctx, vol, score),
            SoundEffect::Perfect { score } => self.play_perfect(ctx, vol, score),
            SoundEffect::Fall => self.play_fall(ctx, vol),
            SoundEffect::Reset => self.play_reset(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Short decaying blip starting `delay` seconds from now
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        level: f32,
        delay: f64,
        length: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.05).ok();
    }

    fn place_pitch(score: u32) -> f32 {
        let step = score.saturating_sub(1) % PLACE_STEPS;
        PLACE_BASE_HZ * 2f32.powf(step as f32 / 12.0)
    }

    /// Pitch glide from `from` to `to` over `length` seconds
    fn sweep(&self, ctx: &AudioContext, from: f32, to: f32, level: f32, length: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();
        let (freq, env) = (osc.frequency(), gain.gain());

        env.set_value_at_time(level, t).ok();
        env.exponential_ramp_to_value_at_time(0.01, t + length).ok();
        freq.set_value_at_time(from, t).ok();
        freq.exponential_ramp_to_value_at_time(to, t + length * 0.75).ok();

        osc.start().ok();
        osc.stop_with_when(t + length + 0.05).ok();
    }

    /// Start - rising sweep
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, 200.0, 600.0, vol * 0.3, 0.2);
    }

    /// Place - woody tap tuned to the stack height
    fn play_place(&self, ctx: &AudioContext, vol: f32, score: u32) {
        let freq = Self::place_pitch(score);
        self.blip(ctx, freq, OscillatorType::Triangle, vol * 0.4, 0.0, 0.12);
        // Low thump underneath
        self.blip(ctx, freq / 2.0, OscillatorType::Sine, vol * 0.3, 0.0, 0.08);
    }

    /// Perfect - tap plus a bright fifth on top
    fn play_perfect(&self, ctx: &AudioContext, vol: f32, score: u32) {
        let freq = Self::place_pitch(score);
        self.blip(ctx, freq, OscillatorType::Triangle, vol * 0.4, 0.0, 0.12);
        self.blip(ctx, freq * 1.5, OscillatorType::Sine, vol * 0.25, 0.06, 0.25);
        self.blip(ctx, freq * 2.0, OscillatorType::Sine, vol * 0.2, 0.12, 0.3);
    }

    /// Fall - sad descending
    fn play_fall(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            self.blip(ctx, *freq, OscillatorType::Sine, vol * 0.3, delay, 0.3);
        }
    }

    /// Reset - quick double click
    fn play_reset(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 700.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            self.blip(ctx, *freq, OscillatorType::Square, vol * 0.15, delay, 0.06);
        }
    }
}
