//! # stormwatch-audio
//!
//! Plays a sound when an alert first appears or changes its event name.
//!
//! The [`CueDispatcher`] owns a background thread and a [`CuePlayer`]. Without
//! the `playback` feature the only backend is [`LogPlayer`]; with it,
//! `RodioPlayer` plays through the default output device.

pub mod cue;
pub mod dispatcher;
pub mod error;
pub mod player;

pub use cue::{Cue, SoundBucket, SoundLibrary, bucket_for};
pub use dispatcher::{CueDispatcher, CueRequest};
pub use error::{AudioError, Result};
pub use player::{CuePlayer, LogPlayer};

#[cfg(feature = "playback")]
pub use player::RodioPlayer;

/// Best available player for this build.
pub fn default_player() -> Box<dyn CuePlayer> {
    #[cfg(feature = "playback")]
    {
        match RodioPlayer::open() {
            Ok(player) => return Box::new(player),
            Err(e) => tracing::warn!(error = %e, "falling back to log-only cues"),
        }
    }
    Box::new(LogPlayer)
}
