//! Colors for the STORMWATCH dashboard.

use ratatui::style::{Color, Modifier, Style};

/// Dashboard chrome colors.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Title and borders of focused elements
    pub header: Color,
    /// Hotkey hints
    pub hotkey: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (clock, hints)
    pub text_dim: Color,
    /// Panel borders
    pub border: Color,
    /// Feed healthy
    pub status_ok: Color,
    /// Feed loading or muted
    pub status_warning: Color,
    /// Feed failing
    pub status_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            hotkey: Color::Yellow,
            text: Color::White,
            text_dim: Color::Gray,
            border: Color::DarkGray,
            status_ok: Color::Green,
            status_warning: Color::Yellow,
            status_error: Color::Red,
        }
    }
}

/// Foreground and background for one alert style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertColors {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl AlertColors {
    const fn new(fg: Color, bg: Color, bold: bool) -> Self {
        Self { fg, bg, bold }
    }
}

/// Colors for a style tag; `None` for untagged events.
pub fn alert_colors(tag: &str) -> Option<AlertColors> {
    let colors = match tag {
        "tornado-warning" => AlertColors::new(Color::White, Color::Rgb(255, 0, 0), false),
        "observed-tornado-warning" => AlertColors::new(Color::White, Color::Rgb(139, 0, 0), true),
        "pds-tornado-warning" => AlertColors::new(Color::White, Color::Rgb(255, 0, 255), true),
        "tornado-emergency" => AlertColors::new(Color::White, Color::Rgb(128, 0, 128), true),
        "severe-thunderstorm-warning" => {
            AlertColors::new(Color::Black, Color::Rgb(255, 165, 0), false)
        }
        "severe-thunderstorm-considerable" => {
            AlertColors::new(Color::Black, Color::Rgb(255, 127, 0), true)
        }
        "pds-severe-thunderstorm-warning" => {
            AlertColors::new(Color::White, Color::Rgb(255, 69, 0), true)
        }
        "flash-flood-warning" => AlertColors::new(Color::Black, Color::Rgb(0, 255, 0), false),
        "tornado-watch" => AlertColors::new(Color::Black, Color::Rgb(255, 255, 0), false),
        "severe-thunderstorm-watch" => {
            AlertColors::new(Color::Black, Color::Rgb(219, 112, 147), false)
        }
        "winter-weather-advisory" => {
            AlertColors::new(Color::White, Color::Rgb(169, 81, 220), false)
        }
        "winter-storm-watch" => AlertColors::new(Color::White, Color::Rgb(0, 0, 255), false),
        "winter-storm-warning" => AlertColors::new(Color::White, Color::Rgb(255, 88, 233), false),
        _ => return None,
    };
    Some(colors)
}

/// Style for an alert row or the top bar headline.
pub fn alert_style(tag: Option<&str>, theme: &Theme) -> Style {
    match tag.and_then(alert_colors) {
        Some(colors) => {
            let style = Style::default().fg(colors.fg).bg(colors.bg);
            if colors.bold {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        }
        None => Style::default().fg(theme.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winter_colors() {
        assert_eq!(
            alert_colors("winter-storm-warning").unwrap().bg,
            Color::Rgb(255, 88, 233)
        );
        assert_eq!(
            alert_colors("winter-storm-watch").unwrap().bg,
            Color::Rgb(0, 0, 255)
        );
        assert_eq!(
            alert_colors("winter-weather-advisory").unwrap().bg,
            Color::Rgb(169, 81, 220)
        );
    }

    #[test]
    fn test_every_engine_tag_has_colors() {
        for name in [
            "Radar Indicated Tornado Warning",
            "Observed Tornado Warning",
            "PDS Tornado Warning",
            "Tornado Emergency",
            "Severe Thunderstorm Warning",
            "Considerable Severe Thunderstorm Warning",
            "Destructive Severe Thunderstorm Warning",
            "Flash Flood Warning",
            "Tornado Watch",
            "Severe Thunderstorm Watch",
            "Winter Weather Advisory",
            "Winter Storm Watch",
            "Winter Storm Warning",
            "Ice Storm Warning",
        ] {
            let tag = stormwatch_engine::style_tag(name).unwrap();
            assert!(alert_colors(tag).is_some(), "no colors for {tag}");
        }
    }

    #[test]
    fn test_untagged_uses_text_color() {
        let theme = Theme::default();
        assert_eq!(alert_style(None, &theme), Style::default().fg(Color::White));
        assert_eq!(
            alert_style(Some("unknown-tag"), &theme),
            Style::default().fg(Color::White)
        );
    }
}
