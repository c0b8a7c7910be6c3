//! Background cue dispatch.
//!
//! Cues are queued on an `mpsc` channel and played by a dedicated thread, so a
//! slow or failing device never holds up reconciliation. Each failure is
//! logged on its own and the thread moves on to the next cue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use stormwatch_engine::Notification;
use tracing::{debug, info, warn};

use crate::cue::{Cue, SoundLibrary};
use crate::error::{AudioError, Result};
use crate::player::CuePlayer;

/// One queued cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueRequest {
    pub alert_id: String,
    pub event_name: String,
    pub cue: Cue,
}

/// Handle to the audio thread. Shared between the poll task and the dashboard.
#[derive(Debug)]
pub struct CueDispatcher {
    tx: Option<Sender<CueRequest>>,
    muted: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CueDispatcher {
    /// Start the audio thread.
    ///
    /// `make_player` runs on the new thread, since some output streams cannot
    /// be moved between threads.
    pub fn spawn<F>(library: SoundLibrary, muted: bool, make_player: F) -> Result<Self>
    where
        F: FnOnce() -> Box<dyn CuePlayer> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<CueRequest>();
        let muted = Arc::new(AtomicBool::new(muted));
        let thread_muted = Arc::clone(&muted);

        let handle = thread::Builder::new()
            .name("stormwatch-audio".to_string())
            .spawn(move || {
                let mut player = make_player();
                info!(backend = player.name(), dir = %library.dir().display(), "audio thread started");

                for request in rx {
                    // Mute may flip while cues are queued
                    if thread_muted.load(Ordering::Relaxed) {
                        debug!(alert_id = %request.alert_id, "dropping queued cue while muted");
                        continue;
                    }
                    let path = library.path_for(request.cue);
                    if let Err(e) = player.play(&path) {
                        warn!(
                            alert_id = %request.alert_id,
                            event = %request.event_name,
                            error = %e,
                            "failed to play cue"
                        );
                    }
                }
                debug!("audio thread exiting");
            })?;

        Ok(Self {
            tx: Some(tx),
            muted,
            handle: Some(handle),
        })
    }

    /// Queue the cue for a notification, if it has one.
    ///
    /// Returns whether a cue was queued.
    pub fn notify(&self, notification: &Notification) -> Result<bool> {
        let Some(cue) = Cue::for_notification(notification) else {
            debug!(
                event = %notification.alert.event_name,
                "no sound for event"
            );
            return Ok(false);
        };
        if self.is_muted() {
            return Ok(false);
        }

        let request = CueRequest {
            alert_id: notification.alert.id.clone(),
            event_name: notification.alert.event_name.clone(),
            cue,
        };
        self.tx
            .as_ref()
            .ok_or(AudioError::ThreadGone)?
            .send(request)
            .map_err(|_| AudioError::ThreadGone)?;
        Ok(true)
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
        info!(muted, "audio cues {}", if muted { "muted" } else { "unmuted" });
    }

    /// Flip the mute flag and return the new state.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.fetch_xor(true, Ordering::Relaxed);
        info!(muted, "audio cues {}", if muted { "muted" } else { "unmuted" });
        muted
    }
}

impl Drop for CueDispatcher {
    fn drop(&mut self) {
        // Closing the channel ends the thread's receive loop
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("audio thread panicked");
        }
    }
}
