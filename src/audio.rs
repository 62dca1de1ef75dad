//! Sound cues
//!
//! The simulation only reports events; an `AudioHook` turns the interesting
//! ones into sound. The browser implementation synthesizes everything with
//! the Web Audio API, no sound files needed. Audio problems never reach the
//! game: they are logged and dropped.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player jumped
    Jump,
    /// Player fell out of the field
    Fall,
}

/// Side channel notified on jump and fall; never blocks the tick
pub trait AudioHook {
    fn play(&self, effect: SoundEffect);
}

impl<T: AudioHook + ?Sized> AudioHook for std::rc::Rc<T> {
    fn play(&self, effect: SoundEffect) {
        (**self).play(effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioHook, SoundEffect};

    /// Audio manager for the game
    ///
    /// The context is created lazily: mobile browsers refuse to start audio
    /// before the first user gesture.
    pub struct AudioManager {
        ctx: RefCell<Option<AudioContext>>,
        /// Already folded with the mute flag
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            Self {
                ctx: RefCell::new(None),
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Create (if needed) and resume the context; call from a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = self.context() {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    if let Err(e) = ctx.resume() {
                        log::debug!("Failed to resume AudioContext: {:?}", e);
                    }
                }
            }
        }

        fn context(&self) -> Option<AudioContext> {
            let mut slot = self.ctx.borrow_mut();
            if slot.is_none() {
                match AudioContext::new() {
                    Ok(ctx) => *slot = Some(ctx),
                    Err(e) => {
                        log::warn!("Failed to create AudioContext - audio disabled: {:?}", e);
                        return None;
                    }
                }
            }
            slot.clone()
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

        /// Jump - short rising beep
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(600.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(800.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Fall - descending buzz
        fn play_fall(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.5).ok();
        }
    }

    impl AudioHook for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = self.context() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_jump(&ctx, vol),
                SoundEffect::Fall => self.play_fall(&ctx, vol),
            }
        }
    }
}
