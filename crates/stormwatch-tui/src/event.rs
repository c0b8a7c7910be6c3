//! Keyboard handling for the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events produced from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Mute or unmute audio cues
    ToggleMute,
    /// Poll the feed now
    Refresh,
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// No action needed
    None,
}

/// Converts key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key(&self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('m') | KeyCode::Char('M') => AppEvent::ToggleMute,
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Refresh,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => AppEvent::ShowHelp,
            KeyCode::Esc => AppEvent::HideHelp,
            _ => AppEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_hotkeys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('q'))), AppEvent::Quit);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('m'))), AppEvent::ToggleMute);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('r'))), AppEvent::Refresh);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('?'))), AppEvent::ShowHelp);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('h'))), AppEvent::ShowHelp);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), AppEvent::HideHelp);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('x'))), AppEvent::None);
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let handler = InputHandler::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key(key), AppEvent::ForceQuit);
        // Plain 'c' does nothing
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('c'))), AppEvent::None);
    }
}
