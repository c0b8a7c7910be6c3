//! Sound output backends.

use std::path::Path;

use tracing::info;

use crate::error::{AudioError, Result};

/// Plays one sound file. Runs on the audio thread only.
pub trait CuePlayer {
    fn play(&mut self, path: &Path) -> Result<()>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Logs cues instead of playing them.
///
/// Used when the binary is built without the `playback` feature or no output
/// device is available.
#[derive(Debug, Default)]
pub struct LogPlayer;

impl CuePlayer for LogPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(AudioError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        info!(sound = %path.display(), "cue");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(feature = "playback")]
pub use rodio_player::RodioPlayer;

#[cfg(feature = "playback")]
mod rodio_player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

    use super::CuePlayer;
    use crate::error::{AudioError, Result};

    /// Plays cues on the default output device, one after another.
    pub struct RodioPlayer {
        // Dropping the stream silences the sink
        _stream: OutputStream,
        sink: Sink,
    }

    impl RodioPlayer {
        pub fn open() -> Result<Self> {
            let stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::OutputDevice(e.to_string()))?;
            let sink = Sink::connect_new(stream.mixer());
            Ok(Self {
                _stream: stream,
                sink,
            })
        }
    }

    impl CuePlayer for RodioPlayer {
        fn play(&mut self, path: &Path) -> Result<()> {
            let file = File::open(path).map_err(|_| AudioError::MissingFile {
                path: path.to_path_buf(),
            })?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            self.sink.append(source);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "rodio"
        }
    }
}
