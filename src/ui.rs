use crate::app::Effect;
use crate::nav::keys::{map_key, parse_script, FormCommand};
use crate::services::loader::{build_props, load_config, LoadedConfig};
use crate::widgets::form::FormState;
use crate::widgets::form_widget::FormWidget;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::Widget;
use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const HELP_TEXT: &str =
    "type to filter · ↑/↓ move · enter select · tab next · esc blur · ^X clear · ^Y copy · ^Q quit";
const DEBUG_PANE_H: u16 = 7;
// 3 seconds @ 200ms
const TOAST_TICKS: u64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

pub(crate) struct AppState {
    pub(crate) form: FormWidget,
    pub(crate) theme: crate::theme::Theme,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) show_debug: bool,
    pub(crate) quit: bool,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
}

impl AppState {
    pub(crate) fn new(form: FormState) -> Self {
        Self {
            form: FormWidget::new(form),
            theme: crate::theme::Theme::synthwave_dark(),
            tick: 0,
            toast: None,
            show_debug: true,
            quit: false,
            debug_log: VecDeque::new(),
        }
    }

    /// Mounts every configured field and focuses the first enabled one.
    pub(crate) fn from_config(loaded: &LoadedConfig) -> Result<Self> {
        let props = build_props(loaded)?;
        let fields = loaded
            .config
            .fields
            .iter()
            .map(|f| f.caption().to_string())
            .zip(props)
            .collect();
        let (form, mounted) = FormState::new(loaded.config.title.clone(), fields);
        let mut state = AppState::new(form);
        if let Some(src) = &loaded.source {
            state.dbg(format!("config: {}", src.display()));
        } else {
            state.dbg("config: built-in demo");
            state.toast("No typeahead.yaml found, showing demo fields", ToastLevel::Info);
        }
        run_effects(&mut state, mounted);
        let focused = state.form.form.focus_current();
        run_effects(&mut state, focused);
        Ok(state)
    }

    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg.into());
    }

    pub(crate) fn toast(&mut self, text: impl Into<String>, level: ToastLevel) {
        self.toast = Some(Toast {
            text: text.into(),
            level,
            expires_at_tick: self.tick + TOAST_TICKS,
        });
    }
}

fn show_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "null".to_string(),
    }
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        let line = match &eff {
            Effect::Change { field_name, value } => {
                tracing::info!(field = %field_name, value = ?value, "onChange");
                format!("onChange {field_name} = {}", show_value(value))
            }
            Effect::Blur { field_name, value } => {
                tracing::debug!(field = %field_name, value = ?value, "onBlur");
                format!("onBlur   {field_name} = {}", show_value(value))
            }
        };
        state.dbg(line);
    }
}

fn copy_values(state: &mut AppState) {
    let yaml = match state.form.form.values_yaml() {
        Ok(y) => y,
        Err(e) => {
            state.dbg(format!("export failed: {e:#}"));
            state.toast("Export failed", ToastLevel::Error);
            return;
        }
    };
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(yaml)) {
        Ok(()) => state.toast("Values copied to clipboard", ToastLevel::Success),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            state.dbg(format!("clipboard: {e}"));
            state.toast("Clipboard unavailable", ToastLevel::Error);
        }
    }
}

pub(crate) fn apply_command(state: &mut AppState, cmd: FormCommand) {
    match cmd {
        FormCommand::Quit => state.quit = true,
        FormCommand::CopyYaml => copy_values(state),
        other => {
            let effects = state.form.on_command(other);
            run_effects(state, effects);
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

/// Replays a key script against a test backend, drawing after every command
/// so pointer hit areas and the edit buffer stay current.
pub(crate) fn run_headless(state: &mut AppState, script: &str) -> Result<()> {
    let backend = ratatui::backend::TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|f| ui(f, state))?;
    for cmd in parse_script(script) {
        apply_command(state, cmd);
        state.tick = state.tick.wrapping_add(1);
        terminal.draw(|f| ui(f, state))?;
        if state.quit {
            break;
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    // Load config anchored by TYPEAHEAD_TUI_CONFIG_DIR or by discovering typeahead.yaml
    let loaded = load_config()?;
    let mut state = AppState::from_config(&loaded)?;

    if env_flag("TYPEAHEAD_TUI_HEADLESS") {
        let script = std::env::var("TYPEAHEAD_TUI_KEYS").unwrap_or_default();
        run_headless(&mut state, &script)?;
        if env_flag("TYPEAHEAD_TUI_SMOKE_SUMMARY") {
            println!("{}", state.form.form.summary_json());
        }
        return Ok(());
    }

    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(cmd) = map_key(&key) {
                        apply_command(&mut state, cmd);
                    }
                }
                Ok(Event::Mouse(m)) => {
                    let effects = state.form.on_mouse(m);
                    run_effects(&mut state, effects);
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        if state.quit {
            break Ok(());
        }
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    res
}

pub(crate) fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }

    let screen = f.area();
    let bg = Block::default().style(Style::default().bg(state.theme.bg));
    f.render_widget(bg, screen);

    let debug_h = if state.show_debug && screen.height > DEBUG_PANE_H + 8 {
        DEBUG_PANE_H
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(debug_h),
            Constraint::Length(1),
        ])
        .split(screen);

    let tick = state.tick;
    state.form.render(f, chunks[0], true, tick);
    if debug_h > 0 {
        draw_debug(f, chunks[1], state);
    }
    draw_footer(f, chunks[2], state, HELP_TEXT);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    // Take last `area.height - 1` lines (one row goes to the border)
    let h = area.height.saturating_sub(1) as usize;
    let start = state.debug_log.len().saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
