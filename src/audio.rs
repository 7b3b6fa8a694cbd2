//! Audio system using Web Audio API
//!
//! Procedurally generated cues - no external files needed! Every failure is
//! returned as a `HookError` so callers can log it without touching game state.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::hooks::{HookError, HookResult};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bird hit a pipe or the floor
    Hit,
    /// Winner gate reached
    Win,
}

/// Ambient loop nodes, kept so the loop can be stopped
struct MusicVoice {
    drone: OscillatorNode,
    lfo: OscillatorNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
    music: Option<MusicVoice>,
    /// Win fanfare voices still scheduled
    win_voices: Vec<OscillatorNode>,
}

fn audio_err(what: &str) -> HookError {
    HookError::Audio(what.to_string())
}

impl AudioManager {
    pub fn new(settings: Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings,
            music: None,
            win_voices: Vec::new(),
        }
    }

    fn context(&self) -> Result<&AudioContext, HookError> {
        let ctx = self.ctx.as_ref().ok_or_else(|| audio_err("no audio context"))?;
        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            ctx.resume().map_err(|_| audio_err("resume rejected"))?;
        }
        Ok(ctx)
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Result<(OscillatorNode, GainNode), HookError> {
        let osc = ctx
            .create_oscillator()
            .map_err(|_| audio_err("create_oscillator"))?;
        let gain = ctx.create_gain().map_err(|_| audio_err("create_gain"))?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain)
            .map_err(|_| audio_err("connect oscillator"))?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(|_| audio_err("connect gain"))?;

        Ok((osc, gain))
    }

    /// Start the ambient loop from the beginning
    pub fn start_music(&mut self) -> HookResult {
        self.stop_music();
        let vol = self.settings.effective_music_volume();
        if vol <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;

        let (drone, gain) = Self::create_osc(ctx, 220.0, OscillatorType::Triangle)?;
        gain.gain().set_value(vol * 0.3);

        // Slow swell on the drone's volume
        let lfo = ctx
            .create_oscillator()
            .map_err(|_| audio_err("create_oscillator"))?;
        let depth = ctx.create_gain().map_err(|_| audio_err("create_gain"))?;
        lfo.frequency().set_value(0.5);
        depth.gain().set_value(vol * 0.15);
        lfo.connect_with_audio_node(&depth)
            .map_err(|_| audio_err("connect lfo"))?;
        depth
            .connect_with_audio_param(&gain.gain())
            .map_err(|_| audio_err("connect lfo depth"))?;

        drone.start().map_err(|_| audio_err("start drone"))?;
        lfo.start().map_err(|_| audio_err("start lfo"))?;
        self.music = Some(MusicVoice { drone, lfo });
        Ok(())
    }

    /// Pause the ambient loop
    pub fn stop_music(&mut self) {
        if let Some(voice) = self.music.take() {
            voice.drone.stop().ok();
            voice.lfo.stop().ok();
        }
    }

    /// Silence a win fanfare that is still ringing
    pub fn stop_win(&mut self) {
        for osc in self.win_voices.drain(..) {
            osc.stop().ok();
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) -> HookResult {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return Ok(());
        }
        match effect {
            SoundEffect::Hit => self.play_hit(vol),
            SoundEffect::Win => self.play_win(vol),
        }
    }

    /// Hit - thump sliding down
    fn play_hit(&self, vol: f32) -> HookResult {
        let ctx = self.context()?;
        let (osc, gain) = Self::create_osc(ctx, 300.0, OscillatorType::Sawtooth)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.4)
            .ok();

        osc.start().map_err(|_| audio_err("start hit"))?;
        osc.stop_with_when(t + 0.5).ok();
        Ok(())
    }

    /// Win - rising fanfare
    fn play_win(&mut self, vol: f32) -> HookResult {
        self.stop_win();
        let ctx = self.context()?.clone();
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            let (osc, gain) = Self::create_osc(&ctx, *freq, OscillatorType::Triangle)?;
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.start_with_when(t)
                .map_err(|_| audio_err("start fanfare"))?;
            osc.stop_with_when(t + 0.7).ok();
            self.win_voices.push(osc);
        }
        Ok(())
    }
}
