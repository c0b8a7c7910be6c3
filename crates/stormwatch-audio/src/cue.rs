//! Mapping from notifications to sound files.

use std::path::PathBuf;

use stormwatch_config::AudioConfig;
use stormwatch_engine::{Notification, NotificationKind};

/// Severity bucket that selects the sound for a new alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundBucket {
    Warning,
    Watch,
    Advisory,
}

const WARNING_EVENTS: &[&str] = &[
    "Tornado Warning",
    "Observed Tornado Warning",
    "PDS Tornado Warning",
    "Radar Indicated Tornado Warning",
    "Tornado Emergency",
    "Severe Thunderstorm Warning",
    "Considerable Severe Thunderstorm Warning",
    "Destructive Severe Thunderstorm Warning",
    "Flash Flood Warning",
];

const WATCH_EVENTS: &[&str] = &["Tornado Watch", "Severe Thunderstorm Watch"];

const ADVISORY_EVENTS: &[&str] = &[
    "Winter Weather Advisory",
    "Winter Storm Watch",
    "Winter Storm Warning",
    "Ice Storm Warning",
    "Heavy Freezing Spray Warning",
    "Lake Effect Snow Warning",
];

/// Bucket for an event name, if it has one.
pub fn bucket_for(event_name: &str) -> Option<SoundBucket> {
    if WARNING_EVENTS.contains(&event_name) {
        Some(SoundBucket::Warning)
    } else if WATCH_EVENTS.contains(&event_name) {
        Some(SoundBucket::Watch)
    } else if ADVISORY_EVENTS.contains(&event_name) {
        Some(SoundBucket::Advisory)
    } else {
        None
    }
}

/// A sound to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// First sighting of an alert in this bucket
    New(SoundBucket),
    /// Event name changed on a known alert
    Upgrade,
}

impl Cue {
    /// Cue for a notification; `None` when a new alert has no bucket.
    pub fn for_notification(notification: &Notification) -> Option<Self> {
        match notification.kind {
            NotificationKind::New => bucket_for(&notification.alert.event_name).map(Cue::New),
            NotificationKind::Upgraded => Some(Cue::Upgrade),
        }
    }
}

/// Resolves cues to files under the sound directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundLibrary {
    dir: PathBuf,
    warning: String,
    watch: String,
    advisory: String,
    upgrade: String,
}

impl SoundLibrary {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            dir: config.sound_dir.clone(),
            warning: config.warning.clone(),
            watch: config.watch.clone(),
            advisory: config.advisory.clone(),
            upgrade: config.upgrade.clone(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn path_for(&self, cue: Cue) -> PathBuf {
        let file = match cue {
            Cue::New(SoundBucket::Warning) => &self.warning,
            Cue::New(SoundBucket::Watch) => &self.watch,
            Cue::New(SoundBucket::Advisory) => &self.advisory,
            Cue::Upgrade => &self.upgrade,
        };
        self.dir.join(file)
    }

    /// Files referenced by the library that do not exist on disk.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        [
            Cue::New(SoundBucket::Warning),
            Cue::New(SoundBucket::Watch),
            Cue::New(SoundBucket::Advisory),
            Cue::Upgrade,
        ]
        .into_iter()
        .map(|cue| self.path_for(cue))
        .filter(|path| !path.is_file())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_core::Alert;

    fn notification(event_name: &str, kind: NotificationKind) -> Notification {
        Notification {
            alert: Alert::new("a", event_name, ""),
            kind,
        }
    }

    #[test]
    fn test_bucket_for_each_list() {
        assert_eq!(bucket_for("Tornado Emergency"), Some(SoundBucket::Warning));
        assert_eq!(
            bucket_for("Radar Indicated Tornado Warning"),
            Some(SoundBucket::Warning)
        );
        assert_eq!(bucket_for("Flash Flood Warning"), Some(SoundBucket::Warning));
        assert_eq!(bucket_for("Severe Thunderstorm Watch"), Some(SoundBucket::Watch));
        assert_eq!(bucket_for("Lake Effect Snow Warning"), Some(SoundBucket::Advisory));
        assert_eq!(bucket_for("Heat Advisory"), None);
        assert_eq!(bucket_for("Flood Advisory"), None);
    }

    #[test]
    fn test_cue_for_notification() {
        assert_eq!(
            Cue::for_notification(&notification("Tornado Watch", NotificationKind::New)),
            Some(Cue::New(SoundBucket::Watch))
        );
        assert_eq!(
            Cue::for_notification(&notification("Heat Advisory", NotificationKind::New)),
            None
        );
        // Upgrades use the upgrade sound regardless of bucket
        assert_eq!(
            Cue::for_notification(&notification("Heat Advisory", NotificationKind::Upgraded)),
            Some(Cue::Upgrade)
        );
    }

    #[test]
    fn test_library_paths() {
        let config = AudioConfig {
            sound_dir: PathBuf::from("/opt/sounds"),
            ..AudioConfig::default()
        };
        let library = SoundLibrary::from_config(&config);
        assert_eq!(
            library.path_for(Cue::New(SoundBucket::Advisory)),
            PathBuf::from("/opt/sounds/advisory.wav")
        );
        assert_eq!(
            library.path_for(Cue::Upgrade),
            PathBuf::from("/opt/sounds/upgrade.wav")
        );
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("warning.wav"), b"RIFF").unwrap();
        let config = AudioConfig {
            sound_dir: dir.path().to_path_buf(),
            ..AudioConfig::default()
        };

        let missing = SoundLibrary::from_config(&config).missing_files();
        assert_eq!(missing.len(), 3);
        assert!(!missing.contains(&dir.path().join("warning.wav")));
    }
}
