//! Sound effects over a platform `SoundTrigger`
//!
//! Playback is best-effort: a missing clip or a device error is logged and the
//! game carries on.

use crate::platform::SoundTrigger;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball touches the paddle
    Contact,
    /// Ball dropped, round over
    End,
}

/// Audio manager for the game
pub struct AudioManager<S: SoundTrigger> {
    trigger: S,
    contact_clip: String,
    end_clip: String,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundTrigger> AudioManager<S> {
    pub fn new(trigger: S, settings: &Settings) -> Self {
        Self {
            trigger,
            contact_clip: settings.contact_clip.clone(),
            end_clip: settings.end_clip.clone(),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Check every clip up front. Returns how many are missing.
    pub fn preload(&mut self) -> usize {
        let mut missing = 0;
        for clip in [&self.contact_clip, &self.end_clip] {
            if let Err(err) = self.trigger.preload(clip) {
                log::warn!("Sound disabled for '{clip}': {err}");
                missing += 1;
            }
        }
        missing
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn clip(&self, effect: SoundEffect) -> &str {
        match effect {
            SoundEffect::Contact => &self.contact_clip,
            SoundEffect::End => &self.end_clip,
        }
    }

    /// Play a sound effect. Returns true if the platform accepted it.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }

        let clip = self.clip(effect).to_string();
        match self.trigger.play(&clip, vol) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Could not play {effect:?} sound: {err}");
                false
            }
        }
    }

    pub fn trigger(&self) -> &S {
        &self.trigger
    }

    pub fn trigger_mut(&mut self) -> &mut S {
        &mut self.trigger
    }
}
