//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short score of oscillator tones; only the playback
//! side touches the browser.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ingredient landed on the plate
    Blip,
    /// Ingredient bounced off
    Error,
    /// Game started or resumed
    Start,
    Pause,
    /// Cake matched the order
    Correct,
    /// Cake did not match
    Wrong,
    LevelUp,
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator note within an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    /// Start frequency (Hz)
    pub freq: f32,
    /// Frequency to glide to by the end, if any
    pub glide_to: Option<f32>,
    /// Seconds after the effect starts
    pub delay: f64,
    /// Seconds until the note has decayed
    pub duration: f64,
    /// Peak gain before volume scaling
    pub gain: f32,
}

const fn note(wave: Wave, freq: f32, delay: f64, duration: f64, gain: f32) -> Tone {
    Tone {
        wave,
        freq,
        glide_to: None,
        delay,
        duration,
        gain,
    }
}

const fn glide(wave: Wave, freq: f32, to: f32, duration: f64, gain: f32) -> Tone {
    Tone {
        wave,
        freq,
        glide_to: Some(to),
        delay: 0.0,
        duration,
        gain,
    }
}

const BLIP: &[Tone] = &[note(Wave::Square, 880.0, 0.0, 0.06, 0.2)];
const ERROR: &[Tone] = &[
    note(Wave::Square, 140.0, 0.0, 0.12, 0.3),
    note(Wave::Square, 110.0, 0.08, 0.12, 0.3),
];
const START: &[Tone] = &[glide(Wave::Triangle, 300.0, 700.0, 0.25, 0.3)];
const PAUSE: &[Tone] = &[glide(Wave::Triangle, 600.0, 250.0, 0.25, 0.3)];
const CORRECT: &[Tone] = &[
    note(Wave::Sine, 660.0, 0.0, 0.15, 0.3),
    note(Wave::Sine, 880.0, 0.1, 0.25, 0.3),
];
const WRONG: &[Tone] = &[glide(Wave::Sawtooth, 300.0, 90.0, 0.4, 0.3)];
const LEVEL_UP: &[Tone] = &[
    note(Wave::Triangle, 500.0, 0.0, 0.25, 0.25),
    note(Wave::Triangle, 600.0, 0.08, 0.25, 0.25),
    note(Wave::Triangle, 750.0, 0.16, 0.25, 0.25),
    note(Wave::Triangle, 1000.0, 0.24, 0.35, 0.25),
];
const GAME_OVER: &[Tone] = &[
    note(Wave::Sine, 400.0, 0.0, 0.3, 0.3),
    note(Wave::Sine, 350.0, 0.2, 0.3, 0.3),
    note(Wave::Sine, 300.0, 0.4, 0.3, 0.3),
    note(Wave::Sine, 200.0, 0.6, 0.5, 0.3),
];

impl SoundEffect {
    /// The sound an event should make, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started | GameEvent::Restarted { .. } | GameEvent::Resumed => {
                Some(SoundEffect::Start)
            }
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Correct { .. } => Some(SoundEffect::Correct),
            GameEvent::Incorrect { .. } => Some(SoundEffect::Wrong),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::DropAccepted => Some(SoundEffect::Blip),
            GameEvent::DropRejected => Some(SoundEffect::Error),
            GameEvent::NewOrder(_)
            | GameEvent::OverlayChanged(_)
            | GameEvent::Notify(_)
            | GameEvent::MuteToggled { .. }
            | GameEvent::PlateCleared => None,
        }
    }

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::Blip => BLIP,
            SoundEffect::Error => ERROR,
            SoundEffect::Start => START,
            SoundEffect::Pause => PAUSE,
            SoundEffect::Correct => CORRECT,
            SoundEffect::Wrong => WRONG,
            SoundEffect::LevelUp => LEVEL_UP,
            SoundEffect::GameOver => GAME_OVER,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{SoundEffect, Tone, Wave};

    const MASTER_VOLUME: f32 = 0.8;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        muted: bool,
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
            Self { ctx, muted: false }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.muted {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, tone);
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;
            osc.frequency().set_value_at_time(tone.freq, t).ok()?;
            if let Some(to) = tone.glide_to {
                osc.frequency().exponential_ramp_to_value_at_time(to, end).ok()?;
            }
            gain.gain()
                .set_value_at_time(tone.gain * MASTER_VOLUME, t)
                .ok()?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(end + 0.05).ok()?;
            Some(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Notification, Order};

    #[test]
    fn test_every_effect_has_audible_tones() {
        let effects = [
            SoundEffect::Blip,
            SoundEffect::Error,
            SoundEffect::Start,
            SoundEffect::Pause,
            SoundEffect::Correct,
            SoundEffect::Wrong,
            SoundEffect::LevelUp,
            SoundEffect::GameOver,
        ];
        for effect in effects {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{:?} is silent", effect);
            for tone in tones {
                assert!(tone.freq > 0.0 && tone.duration > 0.0 && tone.gain > 0.0);
            }
        }
    }

    #[test]
    fn test_event_sounds() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Correct { score: 100 }),
            Some(SoundEffect::Correct)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Incorrect { lives: 2 }),
            Some(SoundEffect::Wrong)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Restarted { game_number: 2 }),
            Some(SoundEffect::Start)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::NewOrder(Order::default())), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Notify(Notification::LevelUp)),
            None
        );
    }
}
