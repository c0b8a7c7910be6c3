//! Main dashboard state and rendering.
//!
//! The `App` owns nothing but view state. Alert data arrives through the
//! monitor's `watch` channels and is pulled once per frame.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use stormwatch_audio::CueDispatcher;
use stormwatch_core::{Category, StormError};
use stormwatch_engine::TopBar;
use tokio::sync::{Notify, watch};
use tracing::debug;

use crate::event::{AppEvent, InputHandler};
use crate::list::AlertList;
use crate::monitor::{DashboardSnapshot, MonitorHandle};
use crate::theme::{Theme, alert_style};

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Input poll timeout; also the redraw cadence for the clock and flashing rows.
const TICK: Duration = Duration::from_millis(100);

/// Half period of the flash highlight.
const FLASH_PHASE_MS: u128 = 500;

/// Main application state.
pub struct App {
    snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
    top_bar_rx: watch::Receiver<TopBar>,
    refresh: Arc<Notify>,
    cues: Option<Arc<CueDispatcher>>,
    input_handler: InputHandler,
    theme: Theme,
    list: AlertList,
    snapshot: Arc<DashboardSnapshot>,
    top_bar: TopBar,
    /// How long new rows stay highlighted
    flash: Duration,
    show_help: bool,
    should_quit: bool,
    status_message: Option<String>,
}

impl App {
    pub fn new(
        snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
        top_bar_rx: watch::Receiver<TopBar>,
        refresh: Arc<Notify>,
        cues: Option<Arc<CueDispatcher>>,
        flash: Duration,
    ) -> Self {
        let snapshot = Arc::clone(&snapshots.borrow());
        let top_bar = top_bar_rx.borrow().clone();
        let mut app = Self {
            snapshots,
            top_bar_rx,
            refresh,
            cues,
            input_handler: InputHandler::new(),
            theme: Theme::default(),
            list: AlertList::new(),
            snapshot,
            top_bar,
            flash,
            show_help: false,
            should_quit: false,
            status_message: None,
        };
        app.sync(Instant::now());
        app
    }

    /// Build an app reading from running monitor tasks.
    pub fn from_monitor(
        monitor: &MonitorHandle,
        cues: Option<Arc<CueDispatcher>>,
        flash: Duration,
    ) -> Self {
        Self::new(
            monitor.snapshots(),
            monitor.top_bar(),
            monitor.refresher(),
            cues,
            flash,
        )
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether cues are currently silenced.
    pub fn is_muted(&self) -> bool {
        self.cues.as_ref().is_none_or(|cues| cues.is_muted())
    }

    /// Pull the latest published values. Returns whether the list changed.
    pub fn sync(&mut self, now: Instant) -> bool {
        self.snapshot = Arc::clone(&self.snapshots.borrow_and_update());
        self.top_bar = self.top_bar_rx.borrow_and_update().clone();
        self.list.sync(&self.snapshot, now)
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let app_event = self.input_handler.handle_key(key);

        // Any key closes the help overlay
        if self.show_help && app_event != AppEvent::ForceQuit {
            self.show_help = false;
            return;
        }

        match app_event {
            AppEvent::Quit | AppEvent::ForceQuit => self.should_quit = true,
            AppEvent::ToggleMute => {
                self.status_message = Some(match &self.cues {
                    Some(cues) => {
                        if cues.toggle_mute() {
                            "Audio cues muted".to_string()
                        } else {
                            "Audio cues on".to_string()
                        }
                    }
                    None => "Audio cues disabled".to_string(),
                });
            }
            AppEvent::Refresh => {
                debug!("manual refresh");
                self.refresh.notify_one();
                self.status_message = Some("Refreshing...".to_string());
            }
            AppEvent::ShowHelp => self.show_help = true,
            AppEvent::HideHelp => self.show_help = false,
            AppEvent::None => {}
        }
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        let mut terminal = init_terminal()?;
        let result = self.run_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            self.sync(Instant::now());
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key_event(key);
            }
        }
        Ok(())
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(5), // Top bar
                Constraint::Length(4), // Counts
                Constraint::Min(5),    // Latest alerts
                Constraint::Length(2), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_top_bar(frame, chunks[1]);
        self.draw_counts(frame, chunks[2]);
        self.draw_list(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);

        if self.show_help {
            self.draw_help_overlay(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let title = " STORMWATCH ";
        let now = Local::now().format("%H:%M:%S").to_string();

        let (status_text, status_color) = if self.snapshot.is_loading() {
            ("[Loading...]".to_string(), theme.status_warning)
        } else if let Some(err) = &self.snapshot.last_error {
            (format!("[Feed error: {err}]"), theme.status_error)
        } else {
            (
                format!("[{} active]", self.snapshot.result.active),
                theme.status_ok,
            )
        };
        let mute_text = if self.is_muted() { "[muted]" } else { "" };

        let right_len = now.len() + 2 + status_text.len() + 1 + mute_text.len();
        let spacing = (area.width as usize).saturating_sub(title.len() + right_len + 2);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(theme.header)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(spacing)),
            Span::styled(now, Style::default().fg(theme.text_dim)),
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
            Span::raw(" "),
            Span::styled(mute_text, Style::default().fg(theme.status_warning)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );

        frame.render_widget(header, area);
    }

    fn draw_top_bar(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let lines = match &self.top_bar {
            TopBar::NoActiveWarnings => vec![Line::from(Span::styled(
                TopBar::NO_ACTIVE_WARNINGS,
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ))],
            TopBar::Showing(shown) => vec![
                Line::from(Span::styled(
                    format!(" {} ", shown.event_name),
                    alert_style(shown.style_tag, theme).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    shown.expiration.clone(),
                    Style::default().fg(theme.text_dim),
                )),
                Line::from(Span::styled(
                    shown.counties.clone(),
                    Style::default().fg(theme.text),
                )),
            ],
        };

        let top_bar = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            );
        frame.render_widget(top_bar, area);
    }

    fn draw_counts(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let counts = &self.snapshot.result.counts;
        let count_span = |category: Category| {
            Span::styled(
                format!("{}: {}", category.label(), counts.get(category)),
                Style::default().fg(theme.text),
            )
        };

        let lines = vec![
            Line::from(vec![
                count_span(Category::Tornado),
                Span::raw("   "),
                count_span(Category::Thunderstorm),
            ]),
            Line::from(vec![
                count_span(Category::Flood),
                Span::raw("   "),
                count_span(Category::Winter),
            ]),
        ];

        let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
        frame.render_widget(panel, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(
                " Latest Alerts: ",
                Style::default()
                    .fg(theme.header)
                    .add_modifier(Modifier::BOLD),
            ));

        if self.list.rows().is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No active alerts",
                Style::default().fg(theme.text_dim),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let now = Instant::now();
        let items: Vec<ListItem> = self
            .list
            .rows()
            .iter()
            .map(|row| {
                let mut style = alert_style(row.entry.style_tag, theme);
                if row.is_flashing(now, self.flash) && flash_on(row.inserted_at, now) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                ListItem::new(Line::from(Span::styled(row.entry.text.clone(), style)))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let hotkey_style = Style::default().fg(theme.hotkey);
        let mute_label = if self.is_muted() { "Unmute " } else { "Mute " };
        let hints = vec![
            Span::styled("[m]", hotkey_style),
            Span::raw(mute_label),
            Span::styled("[r]", hotkey_style),
            Span::raw("Refresh "),
            Span::styled("[?]", hotkey_style),
            Span::raw("Help "),
            Span::styled("[q]", hotkey_style),
            Span::raw("Quit"),
        ];

        let status = self.status_message.clone().unwrap_or_default();
        let footer = Paragraph::new(Line::from(hints))
            .style(Style::default().fg(theme.text_dim))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(Span::styled(status, Style::default().fg(theme.status_warning)))
                    .title_alignment(Alignment::Right),
            );

        frame.render_widget(footer, area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let overlay_width = 50.min(area.width.saturating_sub(4));
        let overlay_height = 14.min(area.height.saturating_sub(4));
        let overlay_x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let overlay_y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(overlay_x, overlay_y, overlay_width, overlay_height);

        frame.render_widget(Clear, overlay_area);

        let help_text = "\
STORMWATCH Hotkeys

  m        Mute / unmute audio cues
  r        Poll the feed now
  ?  h     Show this help
  Esc      Close help
  q        Quit
  Ctrl+C   Force quit

Press any key to close this help.";

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.header))
                    .title(Span::styled(
                        " Help ",
                        Style::default()
                            .fg(theme.header)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(Color::Black)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, overlay_area);
    }
}

/// Alternates every half period from insertion.
fn flash_on(inserted_at: Instant, now: Instant) -> bool {
    (now.saturating_duration_since(inserted_at).as_millis() / FLASH_PHASE_MS) % 2 == 0
}

/// Enter raw mode and the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, StormError> {
    crossterm::terminal::enable_raw_mode().map_err(|e| StormError::terminal_init(e.to_string()))?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)
        .map_err(|e| StormError::terminal_init(e.to_string()))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| StormError::terminal_init(e.to_string()))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), StormError> {
    let restore = |e: io::Error| StormError::terminal_restore(e.to_string());
    crossterm::terminal::disable_raw_mode().map_err(restore)?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )
    .map_err(restore)?;
    terminal.show_cursor().map_err(restore)
}
